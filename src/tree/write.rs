impl super::Tree {
    /// Serialize the entries into the canonical tree payload: for each entry
    /// `"<mode> <name>\0"` followed by the 20 raw bytes of the child id. No
    /// count prefix, no separators; the end of the buffer ends the last
    /// entry. Entries must already be name-sorted.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::new();
        for entry in &self.entries {
            data.extend_from_slice(format!("{:o}", entry.mode).as_bytes());
            data.push(b' ');
            data.extend_from_slice(entry.name.as_bytes());
            data.push(b'\0');
            data.extend_from_slice(&*entry.oid);
        }
        data
    }
}
