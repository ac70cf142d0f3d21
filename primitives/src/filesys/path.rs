// standard library
use std::path::PathBuf;

pub trait PathExt {
    fn path(&self) -> &PathBuf;

    /// Whether anything exists at the path. The answer can be stale by the time
    /// the caller acts on it.
    fn exists(&self) -> bool {
        self.path().exists()
    }
}
