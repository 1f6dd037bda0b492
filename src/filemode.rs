use std::fs::Metadata;
use std::os::unix::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct FileMode(pub u32);

impl std::fmt::Octal for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const REGULAR: FileMode = FileMode(0o100644);

    /// Classify filesystem metadata into one of the three stored modes.
    /// Anything the owner can execute is stored as EXECUTABLE, everything
    /// else as REGULAR.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            Self::DIRECTORY
        } else if metadata.mode() & libc::S_IXUSR != 0 {
            Self::EXECUTABLE
        } else {
            Self::REGULAR
        }
    }

    pub fn is_directory(self) -> bool {
        self.0 & libc::S_IFMT == libc::S_IFDIR
    }
}
