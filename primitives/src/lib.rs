//! Small, synchronous helpers for reading and writing whole files.
//!
//! Reads go through a [`Decoder`](filesys::codec::Decoder) and may fall back to
//! a default value when the file is missing. Writes go through an
//! [`Encoder`](filesys::codec::Encoder), optionally create missing parent
//! directories and can replace the target atomically by staging the data in a
//! temporary file next to it and renaming it into place.

pub mod errors;
pub mod filesys;
pub mod logs;

pub use filesys::{read_file, write_file};
