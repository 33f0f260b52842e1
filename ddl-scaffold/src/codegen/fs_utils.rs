//! File-system primitives used by the project writer

use std::fs;
use std::io;
use std::path::Path;

/// The only I/O the generator performs
pub trait FileSystem {
    /// Does `path` exist and is it a directory
    fn dir_exists(&self, path: &Path) -> bool;

    /// Delete `path` and everything below it
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create `path`, including missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Replace the contents of the file at `path`
    fn write_all_text(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn dir_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_all_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }
}
