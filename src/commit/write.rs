impl super::Commit {
    /// Format the commit payload:
    ///
    /// ```text
    /// tree <hex>
    /// parent <hex>          (only when a parent exists)
    /// author <name> <email> <unix-seconds> +0000
    /// committer <name> <email> <unix-seconds> +0000
    ///
    /// <message>
    /// ```
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "tree {}\n{}author {}\ncommitter {}\n\n{}\n",
            self.tree_id.to_hex(),
            match &self.parent {
                Some(parent) => format!("parent {parent:x}\n"),
                None => String::new(),
            },
            self.author,
            self.committer,
            self.message,
        )
        .into_bytes()
    }
}
