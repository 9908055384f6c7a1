//! `TXT` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use crate::error::{EncodeError, ParseError};
use crate::reader::RecordReader;

use super::{encode_string_into, parse_string, write_quoted, Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record containing text strings. [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// DNS-SD stores `key=value` service attributes here, one per string
/// ([RFC 6763, Section 6](https://www.rfc-editor.org/rfc/rfc6763#section-6)). Values may be
/// binary, so the strings are kept as raw octets.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct TXT {
    /// The character strings, in wire order.
    pub strings: Vec<Vec<u8>>,
}

impl TXT {
    /// Creates a `TXT` record holding a single string.
    pub fn new(string: impl Into<Vec<u8>>) -> Self {
        Self {
            strings: vec![string.into()],
        }
    }

    /// Returns the value of the first `key=value` string whose key matches `key`, ignoring ASCII
    /// case. A string consisting only of the key yields an empty value.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::rdata::TXT;
    ///
    /// let txt = TXT {
    ///     strings: vec![b"txtvers=1".to_vec(), b"Path=/admin".to_vec()],
    /// };
    ///
    /// assert_eq!(txt.value("path"), Some(&b"/admin"[..]));
    /// assert_eq!(txt.value("missing"), None);
    /// ```
    pub fn value(&self, key: &str) -> Option<&[u8]> {
        self.strings.iter().find_map(|string| {
            let (name, value) = match string.iter().position(|b| *b == b'=') {
                Some(idx) => (&string[..idx], &string[idx + 1..]),
                None => (&string[..], &string[string.len()..]),
            };
            name.eq_ignore_ascii_case(key.as_bytes()).then_some(value)
        })
    }
}

impl RdataTrait for TXT {
    fn parse_rdata(reader: &mut RecordReader, rdlength: u16) -> Result<Rdata, ParseError> {
        let rdlength = rdlength as usize;
        let mut strings = Vec::new();
        let mut bytes_read = 0;

        // an empty RDATA is tolerated and yields no strings
        while bytes_read < rdlength {
            let (string, len) = parse_string(reader)?;
            bytes_read += len;
            strings.push(string);
        }

        Ok(Rdata::TXT(Self { strings }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let mut bytes_written = 0usize;
        for string in &self.strings {
            bytes_written += encode_string_into(string, buf)? as usize;
        }
        u16::try_from(bytes_written).map_err(|_| EncodeError::RdataTooLong(bytes_written))
    }
}

impl Display for TXT {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, string) in self.strings.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write_quoted(f, string)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::rdata::{RdataTrait, TXT};
    use crate::reader::RecordReader;
    use crate::RecordType;

    #[test]
    fn round_trip() {
        let txt = TXT::new("hello");
        let encoded = txt.encode().unwrap();
        assert_eq!(encoded, b"\x05hello");

        let mut reader = RecordReader::new(&encoded);
        let rdata = reader.read_record(RecordType::TXT, 6).unwrap();
        assert_eq!(rdata.as_txt(), Some(&txt));
    }

    #[test]
    fn multiple_strings() {
        let msg = b"\x06path=/\x00\x05txtvers=1";
        let mut reader = RecordReader::new(msg);
        let rdata = reader.read_record(RecordType::TXT, 8).unwrap();

        assert_eq!(
            rdata.as_txt().unwrap().strings,
            [b"path=/".to_vec(), Vec::new()]
        );
    }

    #[test]
    fn empty_rdata() {
        let mut reader = RecordReader::new(&[]);
        let rdata = reader.read_record(RecordType::TXT, 0).unwrap();

        assert!(rdata.as_txt().unwrap().strings.is_empty());
    }

    #[test]
    fn string_crossing_rdlength_is_truncated() {
        let mut reader = RecordReader::new(b"\x05hello");

        assert!(matches!(
            reader.read_record(RecordType::TXT, 4),
            Err(ParseError::TruncatedMessage)
        ));
    }

    #[test]
    fn binary_values_are_kept() {
        let msg = [4, b'k', b'=', 0xff, 0x00];
        let mut reader = RecordReader::new(&msg);
        let rdata = reader.read_record(RecordType::TXT, 5).unwrap();
        let txt = rdata.as_txt().unwrap();

        assert_eq!(txt.value("k"), Some(&[0xff, 0x00][..]));
        assert_eq!(rdata.encode().unwrap(), msg);
        assert_eq!(rdata.rdlength().unwrap(), 5);
        assert_eq!(txt.to_string(), "\"k=\u{fffd}\0\"");
    }

    #[test]
    fn display_quotes_strings() {
        let txt = TXT {
            strings: vec!["a=\"b\"".into(), "c".into()],
        };

        assert_eq!(txt.to_string(), r#""a=\"b\"" "c""#);
    }
}
