pub mod codec;
pub mod dir;
pub mod errors;
pub mod file;
pub mod path;

// standard library
use std::fmt;
use std::path::PathBuf;

// internal crates
use crate::deserialize_warn;
use crate::filesys::codec::{Decoder, Encoder};
use crate::filesys::errors::FileSysErr;
use crate::filesys::file::File;

// external crates
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tracing::error;

/// How the bytes of a file relate to text. Raw `Read` / `Write` access on a
/// handle is byte-exact in either mode; the mode only affects the handle's text
/// methods.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Text is transcoded through the given encoding.
    Text(&'static Encoding),
    /// No transcoding. Text is read and written as UTF-8.
    Bytes,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Text(encoding_rs::UTF_8)
    }
}

impl Mode {
    /// Text mode for a WHATWG encoding label such as `"utf-8"`, `"latin1"` or
    /// `"shift_jis"`.
    pub fn text(label: &str) -> Option<Mode> {
        Encoding::for_label(label.trim().as_bytes()).map(Mode::Text)
    }

    pub fn encoding(&self) -> &'static Encoding {
        match self {
            Mode::Text(encoding) => encoding,
            Mode::Bytes => encoding_rs::UTF_8,
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Text(encoding) => write!(f, "Text({})", encoding.name()),
            Mode::Bytes => write!(f, "Bytes"),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Text(encoding) => write!(f, "{}", encoding.name()),
            Mode::Bytes => write!(f, "bytes"),
        }
    }
}

impl Serialize for Mode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Mode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let default = Mode::default();

        let s = match String::deserialize(deserializer) {
            Ok(s) => s,
            Err(e) => {
                error!("Error deserializing mode: {:?}", e);
                return Ok(default);
            }
        };
        match s.to_lowercase().as_str() {
            "bytes" | "binary" => Ok(Mode::Bytes),
            label => match Mode::text(label) {
                Some(mode) => Ok(mode),
                None => {
                    error!("Unknown encoding: {}. Setting to default: '{}'", s, default);
                    Ok(default)
                }
            },
        }
    }
}

/// What to return when the file being read does not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fallback<T> {
    /// No default was supplied: a missing file is an error.
    Fail,
    /// Return this value instead. Any value is valid, including `None` or an
    /// empty string.
    Value(T),
}

impl<T> Default for Fallback<T> {
    fn default() -> Self {
        Fallback::Fail
    }
}

/// Whether missing ancestor directories of the target are created before
/// writing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum EnsureDir {
    No,
    #[default]
    Yes,
}

impl From<bool> for EnsureDir {
    fn from(value: bool) -> Self {
        if value {
            EnsureDir::Yes
        } else {
            EnsureDir::No
        }
    }
}

impl From<EnsureDir> for bool {
    fn from(value: EnsureDir) -> Self {
        value == EnsureDir::Yes
    }
}

/// Whether a write should be performed atomically (write to a temporary file,
/// then rename into place).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Atomic {
    #[default]
    No,
    Yes,
}

impl From<bool> for Atomic {
    fn from(value: bool) -> Self {
        if value {
            Atomic::Yes
        } else {
            Atomic::No
        }
    }
}

impl From<Atomic> for bool {
    fn from(value: Atomic) -> Self {
        value == Atomic::Yes
    }
}

/// Options for file read operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadOptions<T> {
    pub mode: Mode,
    pub fallback: Fallback<T>,
}

impl<T> Default for ReadOptions<T> {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            fallback: Fallback::Fail,
        }
    }
}

impl<T> ReadOptions<T> {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn or_default(mut self, value: T) -> Self {
        self.fallback = Fallback::Value(value);
        self
    }
}

/// Options for file write operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WriteOptions {
    pub mode: Mode,
    pub ensure_dir: EnsureDir,
    pub atomic: Atomic,
}

impl WriteOptions {
    /// Text mode (UTF-8), create missing directories, atomic replace.
    pub fn atomic() -> Self {
        Self {
            atomic: Atomic::Yes,
            ..Default::default()
        }
    }

    /// Bytes mode, create missing directories, non-atomic.
    pub fn bytes() -> Self {
        Self {
            mode: Mode::Bytes,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_ensure_dir(mut self, ensure_dir: EnsureDir) -> Self {
        self.ensure_dir = ensure_dir;
        self
    }

    pub fn with_atomic(mut self, atomic: Atomic) -> Self {
        self.atomic = atomic;
        self
    }
}

impl<'de> Deserialize<'de> for WriteOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DeserializeWriteOptions {
            mode: Option<Mode>,
            ensure_dir: Option<EnsureDir>,
            atomic: Option<Atomic>,
        }

        let default = WriteOptions::default();

        let result = match DeserializeWriteOptions::deserialize(deserializer) {
            Ok(opts) => opts,
            Err(e) => {
                error!("Error deserializing write options: {}", e);
                return Err(e);
            }
        };

        Ok(WriteOptions {
            mode: result
                .mode
                .unwrap_or_else(|| deserialize_warn!("WriteOptions", "mode", default.mode)),
            ensure_dir: result.ensure_dir.unwrap_or_else(|| {
                deserialize_warn!("WriteOptions", "ensure_dir", default.ensure_dir)
            }),
            atomic: result
                .atomic
                .unwrap_or_else(|| deserialize_warn!("WriteOptions", "atomic", default.atomic)),
        })
    }
}

/// Read `path` through `decoder`. See [`File::read_with`].
pub fn read_file<P, D>(
    path: P,
    decoder: D,
    opts: ReadOptions<D::Output>,
) -> Result<D::Output, FileSysErr>
where
    P: Into<PathBuf>,
    D: Decoder,
{
    File::new(path).read_with(decoder, opts)
}

/// Write `data` to `path` through `encoder`. See [`File::write_with`].
pub fn write_file<P, T, E>(
    path: P,
    data: &T,
    encoder: E,
    opts: WriteOptions,
) -> Result<(), FileSysErr>
where
    P: Into<PathBuf>,
    T: ?Sized,
    E: Encoder<T>,
{
    File::new(path).write_with(data, encoder, opts)
}
