//! `MX` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::reader::RecordReader;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record containing mail exchange information.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MX {
    /// Preference among the exchanges of the same owner. Lower values are preferred.
    pub preference: u16,
    /// A host willing to act as a mail exchange for the owner.
    pub exchange: Name,
}

impl RdataTrait for MX {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        let preference = reader.read_u16()?;
        let exchange = reader.read_name()?;
        Ok(Rdata::MX(Self {
            preference,
            exchange,
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_u16::<NetworkEndian>(self.preference)?;
        Ok(2 + self.exchange.encode_into(buf)?)
    }
}

impl Display for MX {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

#[cfg(test)]
mod tests {
    use crate::name::Name;
    use crate::rdata::{Rdata, RdataTrait, MX};
    use crate::reader::RecordReader;
    use crate::RecordType;

    #[test]
    fn round_trip() {
        let mx = MX {
            preference: 10,
            exchange: Name::new("mail.example.com").unwrap(),
        };
        let encoded = mx.encode().unwrap();
        assert_eq!(&encoded[..2], [0, 10]);

        let mut reader = RecordReader::new(&encoded);
        let rdata = reader
            .read_record(RecordType::MX, encoded.len() as u16)
            .unwrap();
        assert_eq!(rdata, Rdata::MX(mx));
        assert_eq!(rdata.to_string(), "10 mail.example.com");
    }
}
