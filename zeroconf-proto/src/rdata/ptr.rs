//! `PTR` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::reader::RecordReader;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record containing a domain name pointer.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// DNS-SD browsing is built on these: a query for `_http._tcp.local` `PTR` is answered with one
/// record per service instance, each pointing to the instance's name.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PTR {
    /// The name the owner points to.
    pub ptrdname: Name,
}

impl PTR {
    pub fn new(ptrdname: Name) -> Self {
        Self { ptrdname }
    }
}

impl RdataTrait for PTR {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        Ok(Rdata::PTR(Self {
            ptrdname: reader.read_name()?,
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        self.ptrdname.encode_into(buf)
    }
}

impl Display for PTR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ptrdname)
    }
}

#[cfg(test)]
mod tests {
    use crate::name::Name;
    use crate::rdata::{RdataTrait, PTR};
    use crate::reader::RecordReader;
    use crate::RecordType;

    #[test]
    fn round_trip() {
        let ptr = PTR::new(Name::new("example.local").unwrap());
        let encoded = ptr.encode().unwrap();
        assert_eq!(ptr.rdlength().unwrap(), 15);

        let mut reader = RecordReader::new(&encoded);
        let rdata = reader.read_record(RecordType::PTR, 15).unwrap();
        assert_eq!(rdata.as_ptr().unwrap().ptrdname.to_string(), "example.local");
    }
}
