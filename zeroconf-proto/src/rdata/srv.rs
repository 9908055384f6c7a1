//! `SRV` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::reader::RecordReader;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record which specifies the location of a service.
/// [\[RFC 2782\]](https://www.rfc-editor.org/rfc/rfc2782)
///
/// In DNS-SD, the owner is the service instance name (e.g. `"Kitchen._raop._tcp.local"`) and the
/// target is the host offering it. Unlike in unicast DNS, mDNS responders may compress the target
/// ([RFC 6762, Section 18.14](https://www.rfc-editor.org/rfc/rfc6762#section-18.14)), so it is
/// decoded with compression allowed.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct SRV {
    /// Lower values are tried first.
    pub priority: u16,
    /// Relative weight among targets of equal priority.
    pub weight: u16,
    pub port: u16,
    pub target: Name,
}

impl RdataTrait for SRV {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        let priority = reader.read_u16()?;
        let weight = reader.read_u16()?;
        let port = reader.read_u16()?;
        let target = reader.read_name()?;
        Ok(Rdata::SRV(Self {
            priority,
            weight,
            port,
            target,
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        buf.write_u16::<NetworkEndian>(self.priority)?;
        buf.write_u16::<NetworkEndian>(self.weight)?;
        buf.write_u16::<NetworkEndian>(self.port)?;
        Ok(6 + self.target.encode_into(buf)?)
    }
}

impl Display for SRV {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}
