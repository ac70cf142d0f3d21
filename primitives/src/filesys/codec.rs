//! Transforms between open file handles and in-memory values.
//!
//! A [`Decoder`] turns a [`ReadHandle`] into a value and an [`Encoder`] writes a
//! value into a [`WriteHandle`]. Both are consumed by the single call they make
//! per operation and cannot keep the handle afterwards. Plain closures
//! (including ones that move or mutate what they capture) implement both
//! traits:
//!
//! ```no_run
//! use file_primitives::filesys::codec::{ReadHandle, TransformError};
//! use file_primitives::filesys::{read_file, ReadOptions};
//!
//! let lines = read_file(
//!     "notes.txt",
//!     |h: &mut ReadHandle| -> Result<usize, TransformError> { Ok(h.read_text()?.lines().count()) },
//!     ReadOptions::default().or_default(0),
//! );
//! ```

// standard library
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;

// internal crates
use crate::filesys::errors::{
    DecodeTextErr, EncodeTextErr, FileSysErr, ParseJSONErr, ReadFileErr, StageFileErr,
    TransformErr, WriteFileErr,
};
use crate::filesys::file::File;
use crate::filesys::Mode;
use crate::trace;

// external crates
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::{de::DeserializeOwned, Serialize};

/// Error type returned by transforms. Errors from this crate raised inside a
/// transform reach the caller unchanged; anything else is wrapped in
/// [`TransformErr`].
pub type TransformError = Box<dyn std::error::Error + Send + Sync>;

pub(crate) fn into_filesys_err(file: &File, e: TransformError) -> FileSysErr {
    match e.downcast::<FileSysErr>() {
        Ok(e) => *e,
        Err(e) => FileSysErr::TransformErr(TransformErr {
            file: file.clone(),
            source: e,
            trace: trace!(),
        }),
    }
}

// ================================== HANDLES ===================================== //

/// Buffered read access to the file being decoded.
pub struct ReadHandle<'a> {
    file: &'a File,
    reader: BufReader<fs::File>,
    mode: Mode,
}

impl<'a> ReadHandle<'a> {
    pub(crate) fn new(file: &'a File, handle: fs::File, mode: Mode) -> Self {
        ReadHandle {
            file,
            reader: BufReader::new(handle),
            mode,
        }
    }

    pub fn file(&self) -> &File {
        self.file
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Read the remaining contents as raw bytes.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, FileSysErr> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf).map_err(|e| {
            FileSysErr::ReadFileErr(ReadFileErr {
                file: self.file.clone(),
                source: e,
                trace: trace!(),
            })
        })?;
        Ok(buf)
    }

    /// Read the remaining contents as text, decoding with the mode's encoding.
    /// Malformed input is an error rather than being replaced.
    pub fn read_text(&mut self) -> Result<String, FileSysErr> {
        let bytes = self.read_bytes()?;
        let encoding = self.mode.encoding();
        match encoding.decode_without_bom_handling_and_without_replacement(&bytes) {
            Some(text) => Ok(text.into_owned()),
            None => Err(FileSysErr::DecodeTextErr(DecodeTextErr {
                file: self.file.clone(),
                encoding: encoding.name(),
                trace: trace!(),
            })),
        }
    }
}

impl Read for ReadHandle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for ReadHandle<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

/// Buffered write access to the file (or staging file) being encoded into.
pub struct WriteHandle<'a> {
    file: &'a File,
    writer: BufWriter<&'a mut fs::File>,
    mode: Mode,
    staged: bool,
}

impl<'a> WriteHandle<'a> {
    /// Handle writing straight into `file`.
    pub(crate) fn new(file: &'a File, handle: &'a mut fs::File, mode: Mode) -> Self {
        WriteHandle {
            file,
            writer: BufWriter::new(handle),
            mode,
            staged: false,
        }
    }

    /// Handle writing into the staging file of an atomic write of `file`. OS
    /// errors surface as [`StageFileErr`].
    pub(crate) fn staged(file: &'a File, handle: &'a mut fs::File, mode: Mode) -> Self {
        WriteHandle {
            staged: true,
            ..Self::new(file, handle, mode)
        }
    }

    /// The target file. During an atomic write the bytes go to a staging file
    /// next to it.
    pub fn file(&self) -> &File {
        self.file
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<(), FileSysErr> {
        self.writer.write_all(buf).map_err(|e| self.write_err(e))
    }

    /// Write text, encoding with the mode's encoding. Characters the encoding
    /// cannot represent are an error rather than being replaced.
    pub fn write_text(&mut self, text: &str) -> Result<(), FileSysErr> {
        let encoding = self.mode.encoding();
        match encode(encoding, text) {
            Some(bytes) => self.write_bytes(&bytes),
            None => Err(FileSysErr::EncodeTextErr(EncodeTextErr {
                file: self.file.clone(),
                encoding: encoding.name(),
                trace: trace!(),
            })),
        }
    }

    /// Flush buffered bytes to the underlying file.
    pub(crate) fn finish(self) -> Result<(), FileSysErr> {
        let (file, staged) = (self.file, self.staged);
        match self.writer.into_inner() {
            Ok(_) => Ok(()),
            Err(e) => Err(map_write_err(file, staged, e.into_error())),
        }
    }

    fn write_err(&self, e: io::Error) -> FileSysErr {
        map_write_err(self.file, self.staged, e)
    }
}

// the same OS failure maps to the same error whether it surfaces while
// buffering or while flushing
fn map_write_err(file: &File, staged: bool, e: io::Error) -> FileSysErr {
    if staged {
        FileSysErr::StageFileErr(StageFileErr {
            file: file.clone(),
            source: e,
            trace: trace!(),
        })
    } else {
        FileSysErr::WriteFileErr(WriteFileErr {
            file: file.clone(),
            source: e,
            trace: trace!(),
        })
    }
}

impl Write for WriteHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

// encoding_rs only encodes into ASCII-compatible encodings, so UTF-16 is
// handled here.
fn encode(encoding: &'static Encoding, text: &str) -> Option<Vec<u8>> {
    if encoding == UTF_8 {
        return Some(text.as_bytes().to_vec());
    }
    if encoding == UTF_16LE {
        return Some(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
    }
    if encoding == UTF_16BE {
        return Some(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
    }
    if encoding.output_encoding() != encoding {
        return None;
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return None;
    }
    Some(bytes.into_owned())
}

// ================================== TRAITS ====================================== //

pub trait Decoder {
    type Output;

    fn decode(self, handle: &mut ReadHandle<'_>) -> Result<Self::Output, TransformError>;
}

impl<F, T> Decoder for F
where
    F: FnOnce(&mut ReadHandle<'_>) -> Result<T, TransformError>,
{
    type Output = T;

    fn decode(self, handle: &mut ReadHandle<'_>) -> Result<T, TransformError> {
        self(handle)
    }
}

pub trait Encoder<T: ?Sized> {
    fn encode(self, data: &T, handle: &mut WriteHandle<'_>) -> Result<(), TransformError>;
}

impl<F, T> Encoder<T> for F
where
    T: ?Sized,
    F: FnOnce(&T, &mut WriteHandle<'_>) -> Result<(), TransformError>,
{
    fn encode(self, data: &T, handle: &mut WriteHandle<'_>) -> Result<(), TransformError> {
        self(data, handle)
    }
}

// ================================== DEFAULTS ==================================== //

/// Whole contents as text.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadToString;

impl Decoder for ReadToString {
    type Output = String;

    fn decode(self, handle: &mut ReadHandle<'_>) -> Result<String, TransformError> {
        Ok(handle.read_text()?)
    }
}

/// Whole contents as raw bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadToEnd;

impl Decoder for ReadToEnd {
    type Output = Vec<u8>;

    fn decode(self, handle: &mut ReadHandle<'_>) -> Result<Vec<u8>, TransformError> {
        Ok(handle.read_bytes()?)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WriteText;

impl Encoder<str> for WriteText {
    fn encode(self, data: &str, handle: &mut WriteHandle<'_>) -> Result<(), TransformError> {
        Ok(handle.write_text(data)?)
    }
}

impl Encoder<String> for WriteText {
    fn encode(self, data: &String, handle: &mut WriteHandle<'_>) -> Result<(), TransformError> {
        Ok(handle.write_text(data)?)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WriteBytes;

impl Encoder<[u8]> for WriteBytes {
    fn encode(self, data: &[u8], handle: &mut WriteHandle<'_>) -> Result<(), TransformError> {
        Ok(handle.write_bytes(data)?)
    }
}

impl Encoder<Vec<u8>> for WriteBytes {
    fn encode(self, data: &Vec<u8>, handle: &mut WriteHandle<'_>) -> Result<(), TransformError> {
        Ok(handle.write_bytes(data)?)
    }
}

/// Pretty printed JSON, written as text in the handle's mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct Json;

impl<T> Encoder<T> for Json
where
    T: Serialize + ?Sized,
{
    fn encode(self, data: &T, handle: &mut WriteHandle<'_>) -> Result<(), TransformError> {
        let json = serde_json::to_string_pretty(data).map_err(|e| {
            FileSysErr::ParseJSONErr(ParseJSONErr {
                file: handle.file().clone(),
                source: e,
                trace: trace!(),
            })
        })?;
        Ok(handle.write_text(&json)?)
    }
}

/// JSON decoded from the handle's text.
pub struct JsonDecoder<T> {
    _phantom: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        JsonDecoder {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Decoder for JsonDecoder<T> {
    type Output = T;

    fn decode(self, handle: &mut ReadHandle<'_>) -> Result<T, TransformError> {
        let text = handle.read_text()?;
        let obj = serde_json::from_str(&text).map_err(|e| {
            FileSysErr::ParseJSONErr(ParseJSONErr {
                file: handle.file().clone(),
                source: e,
                trace: trace!(),
            })
        })?;
        Ok(obj)
    }
}
