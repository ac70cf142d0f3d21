// internal crates
use crate::filesys::temp_dir;
use file_primitives::filesys::{
    codec::JsonDecoder, path::PathExt, Atomic, EnsureDir, Fallback, Mode, ReadOptions,
    WriteOptions,
};

pub mod mode {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(Mode::default(), Mode::Text(encoding_rs::UTF_8));
        assert_eq!(Mode::text("UTF8"), Some(Mode::Text(encoding_rs::UTF_8)));
        assert_eq!(
            Mode::text(" latin1 "),
            Some(Mode::Text(encoding_rs::WINDOWS_1252))
        );
        assert_eq!(Mode::text("klingon"), None);
    }

    #[test]
    fn display() {
        assert_eq!(Mode::default().to_string(), "UTF-8");
        assert_eq!(Mode::text("shift_jis").unwrap().to_string(), "Shift_JIS");
        assert_eq!(Mode::Bytes.to_string(), "bytes");
    }

    #[test]
    fn bytes_mode_text_is_utf8() {
        assert_eq!(Mode::Bytes.encoding(), encoding_rs::UTF_8);
    }

    #[test]
    fn deserialize() {
        let cases = [
            ("\"bytes\"", Mode::Bytes),
            ("\"BINARY\"", Mode::Bytes),
            ("\"utf-16le\"", Mode::Text(encoding_rs::UTF_16LE)),
            ("\"iso-8859-1\"", Mode::Text(encoding_rs::WINDOWS_1252)),
            ("\"klingon\"", Mode::default()),
        ];
        for (input, expected) in cases {
            let mode: Mode = serde_json::from_str(input).unwrap();
            assert_eq!(mode, expected, "input: {input}");
        }

        let mode: Mode = serde_json::from_value(serde_json::json!(42)).unwrap();
        assert_eq!(mode, Mode::default());
    }

    #[test]
    fn serialize() {
        assert_eq!(serde_json::to_string(&Mode::Bytes).unwrap(), "\"bytes\"");
        let utf16 = Mode::text("utf-16be").unwrap();
        let json = serde_json::to_string(&utf16).unwrap();
        assert_eq!(serde_json::from_str::<Mode>(&json).unwrap(), utf16);
    }
}

pub mod fallback {
    use super::*;

    #[test]
    fn default_is_fail() {
        assert_eq!(Fallback::<String>::default(), Fallback::Fail);
    }

    #[test]
    fn none_is_a_value() {
        let (_tmp, dir) = temp_dir();
        let file = dir.file("absent.json");

        let value: Option<serde_json::Value> = file.read_json(Fallback::Value(None)).unwrap();
        assert_eq!(value, None);

        let value = file
            .read_with(
                JsonDecoder::<Option<u32>>::new(),
                ReadOptions::default().or_default(None),
            )
            .unwrap();
        assert_eq!(value, None);
        assert!(!file.exists());
    }
}

pub mod read_options {
    use super::*;

    #[test]
    fn builders() {
        let opts = ReadOptions::<String>::default();
        assert_eq!(opts.mode, Mode::default());
        assert_eq!(opts.fallback, Fallback::Fail);

        let opts = ReadOptions::default()
            .with_mode(Mode::Bytes)
            .or_default(Vec::<u8>::new());
        assert_eq!(opts.mode, Mode::Bytes);
        assert_eq!(opts.fallback, Fallback::Value(Vec::new()));
    }
}

pub mod write_options {
    use super::*;

    #[test]
    fn defaults() {
        let opts = WriteOptions::default();
        assert_eq!(opts.mode, Mode::default());
        assert_eq!(opts.ensure_dir, EnsureDir::Yes);
        assert_eq!(opts.atomic, Atomic::No);
    }

    #[test]
    fn presets() {
        let atomic = WriteOptions::atomic();
        assert_eq!(atomic.atomic, Atomic::Yes);
        assert_eq!(atomic.mode, Mode::default());
        assert_eq!(atomic.ensure_dir, EnsureDir::Yes);

        let bytes = WriteOptions::bytes();
        assert_eq!(bytes.mode, Mode::Bytes);
        assert_eq!(bytes.atomic, Atomic::No);

        let chained = WriteOptions::bytes()
            .with_atomic(Atomic::Yes)
            .with_ensure_dir(EnsureDir::No);
        assert_eq!(
            chained,
            WriteOptions {
                mode: Mode::Bytes,
                ensure_dir: EnsureDir::No,
                atomic: Atomic::Yes,
            }
        );
    }

    #[test]
    fn deserialize_full() {
        let json = r#"{"mode": "bytes", "ensure_dir": false, "atomic": true}"#;
        let opts: WriteOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            opts,
            WriteOptions {
                mode: Mode::Bytes,
                ensure_dir: EnsureDir::No,
                atomic: Atomic::Yes,
            }
        );
    }

    #[test]
    fn deserialize_missing_fields() {
        let opts: WriteOptions = serde_json::from_str(r#"{"atomic": true}"#).unwrap();
        assert_eq!(opts, WriteOptions::atomic());

        let opts: WriteOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, WriteOptions::default());
    }

    #[test]
    fn deserialize_wrong_type() {
        assert!(serde_json::from_str::<WriteOptions>(r#"{"atomic": "yes"}"#).is_err());
        assert!(serde_json::from_str::<WriteOptions>("[]").is_err());
    }

    #[test]
    fn serialize_round_trip() {
        let opts = WriteOptions::atomic().with_mode(Mode::text("latin1").unwrap());
        let json = serde_json::to_value(opts).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mode": "windows-1252", "ensure_dir": true, "atomic": true})
        );
        assert_eq!(serde_json::from_value::<WriteOptions>(json).unwrap(), opts);
    }
}
