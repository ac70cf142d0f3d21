// standard library
use std::ffi::{OsStr, OsString};
use std::fmt::Display;
use std::fs::{self, Permissions};
use std::path::{Path, PathBuf};

// internal crates
use crate::filesys::codec::{
    into_filesys_err, Decoder, Encoder, Json, JsonDecoder, ReadHandle, ReadToEnd, ReadToString,
    WriteBytes, WriteHandle, WriteText,
};
use crate::filesys::dir::{ensure_dir, Dir, PathKind};
use crate::filesys::errors::{
    FileNotFoundErr, FileSysErr, OpenFileErr, ParentDirMissingErr, PersistFileErr, StageFileErr,
    UnknownFileNameErr, UnknownParentDirForFileErr,
};
use crate::filesys::path::PathExt;
use crate::filesys::{Atomic, EnsureDir, Fallback, Mode, ReadOptions, WriteOptions};
use crate::trace;

// external crates
use serde::{de::DeserializeOwned, Serialize};
#[allow(unused_imports)]
use tracing::{debug, error, info, warn};

/// Suffix of the staging files created by atomic writes. Staging files are
/// named `.<file name>.<random>.tmp` and live next to their target.
pub const STAGED_SUFFIX: &str = ".tmp";

/// File struct for interacting with files
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl PathExt for File {
    fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl File {
    pub fn new<T: Into<PathBuf>>(path: T) -> Self {
        File { path: path.into() }
    }

    pub fn name(&self) -> Result<&str, FileSysErr> {
        self.os_name()?.to_str().ok_or_else(|| self.unknown_name_err())
    }

    fn os_name(&self) -> Result<&OsStr, FileSysErr> {
        self.path.file_name().ok_or_else(|| self.unknown_name_err())
    }

    fn unknown_name_err(&self) -> FileSysErr {
        FileSysErr::UnknownFileNameErr(UnknownFileNameErr {
            file: self.clone(),
            trace: trace!(),
        })
    }

    /// The directory containing this file. A bare file name lives in the
    /// current directory.
    pub fn parent(&self) -> Result<Dir, FileSysErr> {
        let parent = self
            .path
            .parent()
            .ok_or(FileSysErr::UnknownParentDirForFileErr(
                UnknownParentDirForFileErr {
                    file: self.clone(),
                    trace: trace!(),
                },
            ))?;
        if parent.as_os_str().is_empty() {
            return Ok(Dir::new("."));
        }
        Ok(Dir::new(parent))
    }

    // ================================ READ ====================================== //

    /// Read this file through `decoder`.
    ///
    /// If the file does not exist the fallback in `opts` is returned without
    /// opening or creating anything, or [`FileSysErr::FileNotFoundErr`] if no
    /// fallback was given. The existence check and the open are separate steps;
    /// a file removed in between surfaces as `FileNotFoundErr` too.
    pub fn read_with<D: Decoder>(
        &self,
        decoder: D,
        opts: ReadOptions<D::Output>,
    ) -> Result<D::Output, FileSysErr> {
        if !self.exists() {
            return match opts.fallback {
                Fallback::Value(default) => {
                    debug!("file {} does not exist, using fallback", self);
                    Ok(default)
                }
                Fallback::Fail => Err(self.not_found_err()),
            };
        }

        let file = fs::File::open(self.path()).map_err(|e| self.map_io_err_for_open(e))?;
        let mut handle = ReadHandle::new(self, file, opts.mode);
        decoder
            .decode(&mut handle)
            .map_err(|e| into_filesys_err(self, e))
    }

    pub fn read_string(&self, fallback: Fallback<String>) -> Result<String, FileSysErr> {
        self.read_with(
            ReadToString,
            ReadOptions {
                fallback,
                ..Default::default()
            },
        )
    }

    pub fn read_bytes(&self, fallback: Fallback<Vec<u8>>) -> Result<Vec<u8>, FileSysErr> {
        self.read_with(
            ReadToEnd,
            ReadOptions {
                mode: Mode::Bytes,
                fallback,
            },
        )
    }

    pub fn read_json<T: DeserializeOwned>(&self, fallback: Fallback<T>) -> Result<T, FileSysErr> {
        self.read_with(
            JsonDecoder::new(),
            ReadOptions {
                fallback,
                ..Default::default()
            },
        )
    }

    // ================================ WRITE ===================================== //

    /// Write `data` to this file through `encoder`.
    ///
    /// With [`Atomic::Yes`] the data is staged in a temporary file next to the
    /// target and renamed over it once complete, so readers see either the old
    /// or the new contents in full. If staging fails the temporary file is
    /// removed and the target is untouched. If the final rename fails the
    /// staging file is kept and reported in [`FileSysErr::PersistFileErr`].
    ///
    /// With [`Atomic::No`] the target is truncated and written in place.
    pub fn write_with<T, E>(&self, data: &T, encoder: E, opts: WriteOptions) -> Result<(), FileSysErr>
    where
        T: ?Sized,
        E: Encoder<T>,
    {
        if opts.ensure_dir == EnsureDir::Yes {
            ensure_dir(self.path(), PathKind::File)?;
        }

        match opts.atomic {
            Atomic::Yes => self.write_atomic(data, encoder, opts.mode),
            Atomic::No => self.write_in_place(data, encoder, opts.mode),
        }
    }

    pub fn write_string(&self, s: &str, opts: WriteOptions) -> Result<(), FileSysErr> {
        self.write_with(s, WriteText, opts)
    }

    pub fn write_bytes(&self, buf: &[u8], opts: WriteOptions) -> Result<(), FileSysErr> {
        self.write_with(buf, WriteBytes, opts)
    }

    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        obj: &T,
        opts: WriteOptions,
    ) -> Result<(), FileSysErr> {
        self.write_with(obj, Json, opts)
    }

    fn write_in_place<T, E>(&self, data: &T, encoder: E, mode: Mode) -> Result<(), FileSysErr>
    where
        T: ?Sized,
        E: Encoder<T>,
    {
        let mut file = fs::File::create(self.path()).map_err(|e| self.map_io_err_for_create(e))?;
        let mut handle = WriteHandle::new(self, &mut file, mode);
        encoder
            .encode(data, &mut handle)
            .map_err(|e| into_filesys_err(self, e))?;
        handle.finish()
    }

    fn write_atomic<T, E>(&self, data: &T, encoder: E, mode: Mode) -> Result<(), FileSysErr>
    where
        T: ?Sized,
        E: Encoder<T>,
    {
        let dir = self.parent()?;
        let mut prefix = OsString::from(".");
        prefix.push(self.os_name()?);
        prefix.push(".");

        let mut staged = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(STAGED_SUFFIX)
            .tempfile_in(dir.path())
            .map_err(|e| self.map_io_err_for_stage(e))?;
        debug!("staging write to {} in {}", self, staged.path().display());

        // the replacement keeps the permissions of the file it replaces
        let permissions = fs::metadata(self.path())
            .ok()
            .filter(|metadata| metadata.is_file())
            .map(|metadata| metadata.permissions());

        let result = self.populate_staged(staged.as_file_mut(), data, encoder, mode, permissions);
        if let Err(e) = result {
            let staged_path = staged.path().to_path_buf();
            // the original error is returned regardless of whether cleanup works
            if let Err(cleanup_err) = staged.close() {
                warn!(
                    "failed to remove staging file {}: {}",
                    staged_path.display(),
                    cleanup_err
                );
            }
            return Err(e);
        }

        staged.persist(self.path()).map_err(|e| {
            let tempfile::PersistError { error, file } = e;
            let staged = match file.keep() {
                Ok((_, path)) => {
                    warn!(
                        "failed to rename {} over {}, keeping staging file: {}",
                        path.display(),
                        self,
                        error
                    );
                    Some(path)
                }
                Err(keep_err) => {
                    warn!(
                        "failed to rename staging file over {} and to keep it: {}",
                        self, keep_err.error
                    );
                    None
                }
            };
            FileSysErr::PersistFileErr(PersistFileErr {
                file: self.clone(),
                staged,
                source: error,
                trace: trace!(),
            })
        })?;
        debug!("published {}", self);
        Ok(())
    }

    fn populate_staged<T, E>(
        &self,
        staged: &mut fs::File,
        data: &T,
        encoder: E,
        mode: Mode,
        permissions: Option<Permissions>,
    ) -> Result<(), FileSysErr>
    where
        T: ?Sized,
        E: Encoder<T>,
    {
        let mut handle = WriteHandle::staged(self, staged, mode);
        encoder
            .encode(data, &mut handle)
            .map_err(|e| into_filesys_err(self, e))?;
        handle.finish()?;
        if let Some(permissions) = permissions {
            staged
                .set_permissions(permissions)
                .map_err(|e| self.stage_err(e))?;
        }
        staged.sync_all().map_err(|e| self.stage_err(e))
    }

    fn not_found_err(&self) -> FileSysErr {
        FileSysErr::FileNotFoundErr(FileNotFoundErr {
            file: self.clone(),
            trace: trace!(),
        })
    }

    fn stage_err(&self, e: std::io::Error) -> FileSysErr {
        FileSysErr::StageFileErr(StageFileErr {
            file: self.clone(),
            source: e,
            trace: trace!(),
        })
    }

    // creating a file (or a staging file next to it) only fails with NotFound
    // when its directory is missing
    fn parent_missing_err(&self) -> FileSysErr {
        match self.parent() {
            Ok(dir) => FileSysErr::ParentDirMissingErr(ParentDirMissingErr {
                file: self.clone(),
                dir,
                trace: trace!(),
            }),
            Err(e) => e,
        }
    }

    fn map_io_err_for_open(&self, e: std::io::Error) -> FileSysErr {
        if e.kind() == std::io::ErrorKind::NotFound {
            self.not_found_err()
        } else {
            FileSysErr::OpenFileErr(OpenFileErr {
                file: self.clone(),
                source: e,
                trace: trace!(),
            })
        }
    }

    fn map_io_err_for_create(&self, e: std::io::Error) -> FileSysErr {
        if e.kind() == std::io::ErrorKind::NotFound {
            self.parent_missing_err()
        } else {
            FileSysErr::OpenFileErr(OpenFileErr {
                file: self.clone(),
                source: e,
                trace: trace!(),
            })
        }
    }

    fn map_io_err_for_stage(&self, e: std::io::Error) -> FileSysErr {
        if e.kind() == std::io::ErrorKind::NotFound {
            self.parent_missing_err()
        } else {
            self.stage_err(e)
        }
    }
}

impl AsRef<Path> for File {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
