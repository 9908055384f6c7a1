//! `SOA` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::reader::RecordReader;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record that marks the start of a zone of authority.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
///
/// All time values are in seconds.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SOA {
    /// The primary name server of the zone.
    pub mname: Name,
    /// The mailbox of the person responsible for the zone, with the `@` replaced by a dot.
    pub rname: Name,
    /// Version number of the zone. Wraps; compare with sequence space arithmetic.
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    /// TTL for negative responses. [\[RFC 2308\]](https://www.rfc-editor.org/rfc/rfc2308)
    pub minimum: u32,
}

impl RdataTrait for SOA {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        Ok(Rdata::SOA(Self {
            mname: reader.read_name()?,
            rname: reader.read_name()?,
            serial: reader.read_u32()?,
            refresh: reader.read_u32()?,
            retry: reader.read_u32()?,
            expire: reader.read_u32()?,
            minimum: reader.read_u32()?,
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let names_len = self.mname.encode_into(buf)? + self.rname.encode_into(buf)?;
        for value in [
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum,
        ] {
            buf.write_u32::<NetworkEndian>(value)?;
        }
        Ok(names_len + 5 * 4)
    }
}

impl Display for SOA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname,
            self.rname,
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum
        )
    }
}
