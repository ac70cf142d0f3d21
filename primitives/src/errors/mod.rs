// standard library
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    NotFound,
    InvalidInput,
    Io,
    Internal,
}

impl Code {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
            Self::Io => "io",
            Self::Internal => "internal",
        }
    }
}

pub trait Error: std::error::Error {
    fn code(&self) -> Code {
        Code::Internal
    }

    /// Whether retrying the same operation may succeed. Nothing in this crate
    /// retries on its own; this is a hint for callers.
    fn is_transient(&self) -> bool {
        false
    }
}

pub fn is_transient_io_err(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

#[derive(Debug, Clone)]
pub struct Trace {
    pub file: &'static str,
    pub line: u32,
}

#[macro_export]
macro_rules! trace {
    () => {
        Box::new($crate::errors::Trace {
            file: file!(),
            line: line!(),
        })
    };
}

#[macro_export]
macro_rules! impl_error {
    ($enum_name:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::errors::Error for $enum_name {
            fn code(&self) -> $crate::errors::Code {
                match self {
                    $(Self::$variant(e) => e.code(),)+
                }
            }
            fn is_transient(&self) -> bool {
                match self {
                    $(Self::$variant(e) => e.is_transient(),)+
                }
            }
        }
    };
}

#[macro_export]
macro_rules! deserialize_warn {
    ($struct_name:expr, $field_name:expr, $default:expr) => {{
        ::tracing::warn!(
            "'{}' missing from struct '{}', setting to default: '{:?}'",
            $field_name,
            $struct_name,
            $default
        );
        $default
    }};
}
