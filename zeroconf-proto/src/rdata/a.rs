//! `A` RDATA definition.

use std::fmt::Display;
use std::io::Write;
use std::net::Ipv4Addr;

use crate::error::{EncodeError, ParseError};
use crate::reader::RecordReader;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record containing an IPv4 host address. [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// The address is kept in dotted-decimal text form, exactly as decoded or as given by the caller.
/// It is only validated when the record is encoded: anything other than four dot-separated byte
/// values is rejected with [`EncodeError::InvalidFieldValue`] at that point.
///
/// # Examples
/// ```rust
/// use std::net::Ipv4Addr;
/// use zeroconf_proto::rdata::{RdataTrait, A};
///
/// let a = A::from(Ipv4Addr::new(192, 0, 2, 1));
/// assert_eq!(a.address, "192.0.2.1");
/// assert_eq!(a.encode().unwrap(), [192, 0, 2, 1]);
///
/// assert!(A::new("192.0.2").encode().is_err());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct A {
    /// The host's address, e.g. `"10.0.0.5"`.
    pub address: String,
}

impl A {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Parses [`Self::address`] into its four octets.
    pub fn octets(&self) -> Result<[u8; 4], EncodeError> {
        let invalid = || EncodeError::InvalidFieldValue(format!("IPv4 address {:?}", self.address));

        let mut octets = [0; 4];
        let mut parts = self.address.split('.');
        for octet in octets.iter_mut() {
            *octet = parts
                .next()
                .and_then(|part| part.parse().ok())
                .ok_or_else(invalid)?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(octets)
    }
}

impl From<Ipv4Addr> for A {
    fn from(address: Ipv4Addr) -> Self {
        Self::new(address.to_string())
    }
}

impl RdataTrait for A {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        let octets = reader.read_bytes(4)?;
        let address = format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3]);
        Ok(Rdata::A(Self { address }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_all(&self.octets()?)?;
        Ok(4)
    }
}

impl Display for A {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}
