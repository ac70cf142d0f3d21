// standard library
use std::io;
use std::path::PathBuf;

// internal crates
use crate::errors::{is_transient_io_err, Code, Error, Trace};
use crate::filesys::{dir::Dir, file::File};

#[derive(Debug, thiserror::Error)]
#[error("unable to determine file name for file path: {file}")]
pub struct UnknownFileNameErr {
    pub file: File,
    pub trace: Box<Trace>,
}

impl Error for UnknownFileNameErr {
    fn code(&self) -> Code {
        Code::InvalidInput
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unable to determine parent directory for file path: {file}")]
pub struct UnknownParentDirForFileErr {
    pub file: File,
    pub trace: Box<Trace>,
}

impl Error for UnknownParentDirForFileErr {
    fn code(&self) -> Code {
        Code::InvalidInput
    }
}

#[derive(Debug, thiserror::Error)]
#[error("file not found: {file}")]
pub struct FileNotFoundErr {
    pub file: File,
    pub trace: Box<Trace>,
}

impl Error for FileNotFoundErr {
    fn code(&self) -> Code {
        Code::NotFound
    }
}

#[derive(Debug, thiserror::Error)]
#[error("parent directory '{dir}' of file '{file}' does not exist")]
pub struct ParentDirMissingErr {
    pub file: File,
    pub dir: Dir,
    pub trace: Box<Trace>,
}

impl Error for ParentDirMissingErr {
    fn code(&self) -> Code {
        Code::NotFound
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to create directory '{dir}': {source}")]
pub struct CreateDirErr {
    pub dir: Dir,
    pub source: io::Error,
    pub trace: Box<Trace>,
}

impl Error for CreateDirErr {
    fn code(&self) -> Code {
        Code::Io
    }

    fn is_transient(&self) -> bool {
        is_transient_io_err(&self.source)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to read directory '{dir}': {source}")]
pub struct ReadDirErr {
    pub dir: Dir,
    pub source: io::Error,
    pub trace: Box<Trace>,
}

impl Error for ReadDirErr {
    fn code(&self) -> Code {
        Code::Io
    }

    fn is_transient(&self) -> bool {
        is_transient_io_err(&self.source)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to open file '{file}': {source}")]
pub struct OpenFileErr {
    pub file: File,
    pub source: io::Error,
    pub trace: Box<Trace>,
}

impl Error for OpenFileErr {
    fn code(&self) -> Code {
        Code::Io
    }

    fn is_transient(&self) -> bool {
        is_transient_io_err(&self.source)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to read file '{file}': {source}")]
pub struct ReadFileErr {
    pub file: File,
    pub source: io::Error,
    pub trace: Box<Trace>,
}

impl Error for ReadFileErr {
    fn code(&self) -> Code {
        Code::Io
    }

    fn is_transient(&self) -> bool {
        is_transient_io_err(&self.source)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to write to file '{file}': {source}")]
pub struct WriteFileErr {
    pub file: File,
    pub source: io::Error,
    pub trace: Box<Trace>,
}

impl Error for WriteFileErr {
    fn code(&self) -> Code {
        Code::Io
    }

    fn is_transient(&self) -> bool {
        is_transient_io_err(&self.source)
    }
}

/// The staging file for an atomic write of `file` could not be created or
/// populated. The staging file has already been removed and the target is
/// untouched.
#[derive(Debug, thiserror::Error)]
#[error("failed to stage atomic write for file '{file}': {source}")]
pub struct StageFileErr {
    pub file: File,
    pub source: io::Error,
    pub trace: Box<Trace>,
}

impl Error for StageFileErr {
    fn code(&self) -> Code {
        Code::Io
    }

    fn is_transient(&self) -> bool {
        is_transient_io_err(&self.source)
    }
}

/// Renaming the fully written staging file over `file` failed. `staged` is the
/// staging file left on disk, if it could be kept.
#[derive(Debug, thiserror::Error)]
#[error("failed to rename staged file {} over '{file}': {source}", display_staged(.staged))]
pub struct PersistFileErr {
    pub file: File,
    pub staged: Option<PathBuf>,
    pub source: io::Error,
    pub trace: Box<Trace>,
}

fn display_staged(staged: &Option<PathBuf>) -> String {
    match staged {
        Some(path) => format!("'{}'", path.display()),
        None => "(discarded)".to_string(),
    }
}

impl Error for PersistFileErr {
    fn code(&self) -> Code {
        Code::Io
    }

    fn is_transient(&self) -> bool {
        is_transient_io_err(&self.source)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("contents of file '{file}' are not valid {encoding}")]
pub struct DecodeTextErr {
    pub file: File,
    pub encoding: &'static str,
    pub trace: Box<Trace>,
}

impl Error for DecodeTextErr {
    fn code(&self) -> Code {
        Code::InvalidInput
    }
}

#[derive(Debug, thiserror::Error)]
#[error("text written to file '{file}' is not representable in {encoding}")]
pub struct EncodeTextErr {
    pub file: File,
    pub encoding: &'static str,
    pub trace: Box<Trace>,
}

impl Error for EncodeTextErr {
    fn code(&self) -> Code {
        Code::InvalidInput
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to convert json for file '{file}': {source}")]
pub struct ParseJSONErr {
    pub file: File,
    pub source: serde_json::Error,
    pub trace: Box<Trace>,
}

impl Error for ParseJSONErr {
    fn code(&self) -> Code {
        Code::InvalidInput
    }
}

/// A caller supplied decoder or encoder failed with an error foreign to this
/// crate.
#[derive(Debug, thiserror::Error)]
#[error("transform failed for file '{file}': {source}")]
pub struct TransformErr {
    pub file: File,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
    pub trace: Box<Trace>,
}

impl Error for TransformErr {}

#[derive(Debug, thiserror::Error)]
pub enum FileSysErr {
    #[error(transparent)]
    UnknownFileNameErr(UnknownFileNameErr),
    #[error(transparent)]
    UnknownParentDirForFileErr(UnknownParentDirForFileErr),
    #[error(transparent)]
    FileNotFoundErr(FileNotFoundErr),
    #[error(transparent)]
    ParentDirMissingErr(ParentDirMissingErr),
    #[error(transparent)]
    DecodeTextErr(DecodeTextErr),
    #[error(transparent)]
    EncodeTextErr(EncodeTextErr),
    #[error(transparent)]
    TransformErr(TransformErr),

    // external crate errors
    #[error(transparent)]
    CreateDirErr(CreateDirErr),
    #[error(transparent)]
    ReadDirErr(ReadDirErr),
    #[error(transparent)]
    OpenFileErr(OpenFileErr),
    #[error(transparent)]
    ReadFileErr(ReadFileErr),
    #[error(transparent)]
    WriteFileErr(WriteFileErr),
    #[error(transparent)]
    StageFileErr(StageFileErr),
    #[error(transparent)]
    PersistFileErr(PersistFileErr),
    #[error(transparent)]
    ParseJSONErr(ParseJSONErr),
}

crate::impl_error!(FileSysErr {
    UnknownFileNameErr,
    UnknownParentDirForFileErr,
    FileNotFoundErr,
    ParentDirMissingErr,
    DecodeTextErr,
    EncodeTextErr,
    TransformErr,
    CreateDirErr,
    ReadDirErr,
    OpenFileErr,
    ReadFileErr,
    WriteFileErr,
    StageFileErr,
    PersistFileErr,
    ParseJSONErr,
});
