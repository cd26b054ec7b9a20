//! Uploaded file DTOs.
//!
//! A [`TempFile`] is a [`TempFileHeader`] plus base64-encoded content. The
//! header alone is what gets listed or echoed back; the content only travels
//! with the upload itself.

use base64::Engine;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use super::wire::{wire_deserialize, wire_serialize, FromWire, ToWire, WireObject};
use crate::error::{DecodeError, DecodeResult};

/// Size, name and content hash of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempFileHeader {
    pub length: u64,
    pub name: String,
    pub hash: String,
}

impl TempFileHeader {
    pub fn new(length: u64, name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            length,
            name: name.into(),
            hash: hash.into(),
        }
    }

    /// Extension of `name` including the leading dot (`".txt"`), or `""`.
    ///
    /// Only the text after the last `/` counts, so a name ending in `/` has no
    /// extension. Leading dots belong to the stem: `".bashrc"`, `"..bashrc"`
    /// and `"..."` have none, while `"file."` has `"."`.
    pub fn file_extension(&self) -> String {
        let file_name = self.name.rsplit('/').next().unwrap_or_default();
        match file_name.rfind('.') {
            Some(dot) if file_name[..dot].bytes().any(|b| b != b'.') => {
                file_name[dot..].to_string()
            }
            _ => String::new(),
        }
    }
}

impl ToWire for TempFileHeader {
    fn to_wire(&self) -> Value {
        json!({
            "length": self.length,
            "name": self.name,
            "hash": self.hash,
        })
    }
}

impl FromWire for TempFileHeader {
    const ENTITY: &'static str = "TempFileHeader";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            length: obj.u64("length")?,
            name: obj.str("name")?,
            hash: obj.str("hash")?,
        })
    }
}

/// An uploaded file with its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempFile {
    header: TempFileHeader,
    /// Standard base64.
    pub content: String,
}

impl TempFile {
    pub fn new(header: TempFileHeader, content: impl Into<String>) -> Self {
        Self {
            header,
            content: content.into(),
        }
    }

    /// Build a file from raw bytes, filling in length and SHA-256 hash.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        let header = TempFileHeader::new(bytes.len() as u64, name, sha256_hex(bytes));
        let content = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self { header, content }
    }

    pub fn header(&self) -> &TempFileHeader {
        &self.header
    }

    pub fn into_header(self) -> TempFileHeader {
        self.header
    }

    pub fn file_extension(&self) -> String {
        self.header.file_extension()
    }

    /// Wire form of the header alone, without `content`.
    pub fn header_wire(&self) -> Value {
        self.header.to_wire()
    }

    pub fn get_file_bytes(&self) -> DecodeResult<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.content)?)
    }

    /// Decode the content and check it against the header's length and hash.
    ///
    /// The hash comparison is case-insensitive hex SHA-256.
    pub fn verify(&self) -> DecodeResult<Vec<u8>> {
        let bytes = self.get_file_bytes()?;
        let actual_len = bytes.len() as u64;
        if actual_len != self.header.length {
            return Err(DecodeError::LengthMismatch {
                expected: self.header.length,
                actual: actual_len,
            });
        }
        let actual_hash = sha256_hex(&bytes);
        if !actual_hash.eq_ignore_ascii_case(&self.header.hash) {
            return Err(DecodeError::HashMismatch {
                expected: self.header.hash.clone(),
                actual: actual_hash,
            });
        }
        Ok(bytes)
    }
}

impl ToWire for TempFile {
    fn to_wire(&self) -> Value {
        let mut wire = self.header.to_wire();
        if let Value::Object(map) = &mut wire {
            map.insert("content".to_string(), Value::String(self.content.clone()));
        }
        wire
    }
}

impl FromWire for TempFile {
    const ENTITY: &'static str = "TempFile";

    fn from_wire(value: &Value) -> DecodeResult<Self> {
        let header = TempFileHeader::from_wire(value)?;
        let obj = WireObject::new(Self::ENTITY, value)?;
        Ok(Self {
            header,
            content: obj.str("content")?,
        })
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    format!("{digest:x}")
}

wire_serialize!(TempFileHeader, TempFile);
wire_deserialize!(TempFileHeader, TempFile);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_extension_follows_path_rules() {
        let ext = |name: &str| TempFileHeader::new(0, name, "h").file_extension();
        assert_eq!(ext("a.txt"), ".txt");
        assert_eq!(ext("noext"), "");
        assert_eq!(ext("archive.tar.gz"), ".gz");
        assert_eq!(ext(".bashrc"), "");
        assert_eq!(ext("reports.d/summary"), "");
        assert_eq!(ext("reports/q3.pdf"), ".pdf");
    }

    #[test]
    fn file_extension_edge_names() {
        let ext = |name: &str| TempFileHeader::new(0, name, "h").file_extension();
        assert_eq!(ext("..bashrc"), "");
        assert_eq!(ext("..."), "");
        assert_eq!(ext("dir/a.txt/"), "");
        assert_eq!(ext("file."), ".");
        assert_eq!(ext("..config.yaml"), ".yaml");
        assert_eq!(ext(""), "");
    }

    #[test]
    fn get_file_bytes_decodes_base64() {
        let file = TempFile::new(TempFileHeader::new(4, "x.bin", "h"), "YWJjZA==");
        assert_eq!(file.get_file_bytes().unwrap(), b"abcd");
    }

    #[test]
    fn malformed_base64_fails() {
        let file = TempFile::new(TempFileHeader::new(4, "x.bin", "h"), "not base64!");
        assert!(matches!(
            file.get_file_bytes(),
            Err(DecodeError::InvalidBase64(_))
        ));
    }

    #[test]
    fn header_form_excludes_content() {
        let file = TempFile::from_bytes("notes.txt", b"hello");
        let header = file.header_wire();
        assert!(header.get("content").is_none());
        assert_eq!(header["length"], json!(5));

        let full = file.to_wire();
        assert_eq!(full["content"], json!("aGVsbG8="));
        assert_eq!(full["name"], json!("notes.txt"));
    }

    #[test]
    fn from_bytes_fills_length_and_hash() {
        let file = TempFile::from_bytes("a.txt", b"abc");
        assert_eq!(file.header().length, 3);
        assert_eq!(
            file.header().hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(file.verify().unwrap(), b"abc");
    }

    #[test]
    fn verify_catches_tampered_content() {
        let mut file = TempFile::from_bytes("a.txt", b"abc");
        file.content = base64::engine::general_purpose::STANDARD.encode(b"abd");
        assert!(matches!(
            file.verify(),
            Err(DecodeError::HashMismatch { .. })
        ));

        let short = TempFile::new(TempFileHeader::new(10, "a.txt", "h"), "YWJj");
        assert!(matches!(
            short.verify(),
            Err(DecodeError::LengthMismatch {
                expected: 10,
                actual: 3
            })
        ));
    }

    #[test]
    fn temp_file_roundtrips() {
        let file = TempFile::from_bytes("data/report.csv", b"month,total\n1,20\n");
        assert_eq!(TempFile::from_wire(&file.to_wire()).unwrap(), file);
    }

    #[test]
    fn temp_file_requires_content() {
        let header = TempFileHeader::new(3, "a.txt", "h").to_wire();
        assert!(matches!(
            TempFile::from_wire(&header),
            Err(DecodeError::MissingKey {
                entity: "TempFile",
                key: "content"
            })
        ));
        assert_eq!(
            TempFileHeader::from_wire_opt(Some(&header)).unwrap(),
            Some(TempFileHeader::new(3, "a.txt", "h"))
        );
    }

    #[test]
    fn empty_source_gives_no_file() {
        assert_eq!(TempFile::from_wire_opt(Some(&Value::Null)).unwrap(), None);
        assert_eq!(TempFileHeader::from_wire_opt(None).unwrap(), None);
    }
}
