//! `AAAA` RDATA definition.

use std::fmt::Display;
use std::io::Write;
use std::net::Ipv6Addr;

use crate::error::{EncodeError, ParseError};
use crate::reader::RecordReader;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record containing an IPv6 host address.
/// [\[RFC 3596\]](https://www.rfc-editor.org/rfc/rfc3596)
///
/// Like [`A`](super::A), the address is kept as text and only validated on encode.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct AAAA {
    /// The host's address in the usual compressed notation, e.g. `"fe80::1"`.
    pub address: String,
}

impl AAAA {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl From<Ipv6Addr> for AAAA {
    fn from(address: Ipv6Addr) -> Self {
        Self::new(address.to_string())
    }
}

impl RdataTrait for AAAA {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        let mut octets = [0; 16];
        octets.copy_from_slice(reader.read_bytes(16)?);
        Ok(Rdata::AAAA(Self {
            address: Ipv6Addr::from(octets).to_string(),
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let address: Ipv6Addr = self.address.parse().map_err(|_| {
            EncodeError::InvalidFieldValue(format!("IPv6 address {:?}", self.address))
        })?;
        buf.write_all(&address.octets())?;
        Ok(16)
    }
}

impl Display for AAAA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv6Addr;

    use crate::error::EncodeError;
    use crate::rdata::{RdataTrait, AAAA};
    use crate::reader::RecordReader;
    use crate::RecordType;

    #[test]
    fn round_trip() {
        let aaaa = AAAA::from(Ipv6Addr::new(0xfe80, 0, 0, 0, 0x1c2b, 0, 0, 1));
        let encoded = aaaa.encode().unwrap();
        assert_eq!(encoded.len(), 16);

        let mut reader = RecordReader::new(&encoded);
        let rdata = reader.read_record(RecordType::AAAA, 16).unwrap();
        assert_eq!(rdata.as_aaaa().unwrap().address, "fe80::1c2b:0:0:1");
    }

    #[test]
    fn invalid_address_fails_at_encode_time() {
        assert!(matches!(
            AAAA::new("fe80::1::2").encode(),
            Err(EncodeError::InvalidFieldValue(_))
        ));
    }
}
