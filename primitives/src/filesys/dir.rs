// standard library
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

// internal crates
use crate::filesys::{
    errors::{CreateDirErr, FileSysErr, ReadDirErr},
    file::File,
    path::PathExt,
};
use crate::trace;

// external crates
#[allow(unused_imports)]
use tracing::{debug, error, info, warn};

/// Whether a path handed to [`ensure_dir`] names a file or a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    /// Create the parent chain of the path.
    File,
    /// Create the path itself and its parent chain.
    Dir,
}

/// Create every missing directory needed for `path`. Existing directories are
/// left alone.
pub fn ensure_dir<P: AsRef<Path>>(path: P, kind: PathKind) -> Result<(), FileSysErr> {
    let path = path.as_ref();
    let dir = match kind {
        PathKind::Dir => Dir::new(path),
        PathKind::File => match path.parent() {
            Some(parent) => Dir::new(parent),
            // filesystem root
            None => return Ok(()),
        },
    };
    dir.create_if_absent()
}

/// Dir struct for interacting with directories
#[derive(Clone, Debug)]
pub struct Dir {
    path: PathBuf,
}

impl Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl PathExt for Dir {
    fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Dir {
    /// Create a new Dir instance. The directory does not need to exist.
    pub fn new<T: Into<PathBuf>>(path: T) -> Dir {
        Dir { path: path.into() }
    }

    /// Create a new Dir instance using a relative path from this directory
    pub fn subdir<T: Into<PathBuf>>(&self, rel_path: T) -> Dir {
        let rel_path = rel_path.into();
        let rel_path_stripped = rel_path
            .strip_prefix(std::path::MAIN_SEPARATOR.to_string())
            .unwrap_or(&rel_path);
        Dir::new(self.path.join(rel_path_stripped))
    }

    /// Create a new File instance using a filename appended to this directory
    pub fn file(&self, file_name: &str) -> File {
        let file_name_path = Path::new(file_name);
        let file_name_stripped = file_name_path
            .strip_prefix(std::path::MAIN_SEPARATOR.to_string())
            .unwrap_or(file_name_path);
        File::new(self.path.join(file_name_stripped))
    }

    /// Create this directory and any missing parent directories. Does nothing if
    /// the directory already exists.
    pub fn create_if_absent(&self) -> Result<(), FileSysErr> {
        if self.path.as_os_str().is_empty() || self.exists() {
            return Ok(());
        }
        debug!("creating directory {}", self);
        fs::create_dir_all(self.path()).map_err(|e| {
            FileSysErr::CreateDirErr(CreateDirErr {
                dir: self.clone(),
                source: e,
                trace: trace!(),
            })
        })
    }

    /// Return the regular files directly inside this directory, sorted by path
    pub fn files(&self) -> Result<Vec<File>, FileSysErr> {
        let read_dir_err = |e| {
            FileSysErr::ReadDirErr(ReadDirErr {
                dir: self.clone(),
                source: e,
                trace: trace!(),
            })
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(self.path()).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            if entry.path().is_file() {
                files.push(File::new(entry.path()));
            }
        }
        files.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(files)
    }
}
