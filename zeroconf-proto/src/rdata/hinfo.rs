//! `HINFO` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use crate::error::{EncodeError, ParseError};
use crate::reader::RecordReader;

use super::{encode_string_into, parse_string, write_quoted, Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record describing the hardware and operating system of a host.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct HINFO {
    pub cpu: Vec<u8>,
    pub os: Vec<u8>,
}

impl RdataTrait for HINFO {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        let (cpu, _) = parse_string(reader)?;
        let (os, _) = parse_string(reader)?;
        Ok(Rdata::HINFO(Self { cpu, os }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        Ok(encode_string_into(&self.cpu, buf)? + encode_string_into(&self.os, buf)?)
    }
}

impl Display for HINFO {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_quoted(f, &self.cpu)?;
        write!(f, " ")?;
        write_quoted(f, &self.os)
    }
}

#[cfg(test)]
mod tests {
    use crate::rdata::{Rdata, RdataTrait, HINFO};
    use crate::reader::RecordReader;
    use crate::RecordType;

    #[test]
    fn round_trip() {
        let hinfo = HINFO {
            cpu: "ARMV7".into(),
            os: "LINUX".into(),
        };
        let encoded = hinfo.encode().unwrap();
        assert_eq!(encoded, b"\x05ARMV7\x05LINUX");

        let mut reader = RecordReader::new(&encoded);
        let rdata = reader.read_record(RecordType::HINFO, 12).unwrap();
        assert_eq!(rdata, Rdata::HINFO(hinfo));
        assert_eq!(rdata.to_string(), "\"ARMV7\" \"LINUX\"");
    }
}
