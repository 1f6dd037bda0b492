mod commit;
mod init;
mod pack;

/// Create a set of files under `$root`, making parent directories as
/// needed. Each file's contents are its path with a `-contents` suffix and
/// a trailing newline.
#[macro_export]
macro_rules! create_test_files {
    ($root:ident, [$($path:expr),*]) => {{
        use std::io::Write;
        $({
            let path = $root.join($path);
            std::fs::create_dir_all(path.parent().unwrap())?;
            writeln!(std::fs::File::create(&path)?, "{}-contents", $path)?;
        })*
    }};
}
