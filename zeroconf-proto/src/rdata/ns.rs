//! `NS` RDATA definition.

use std::fmt::Display;
use std::io::Write;

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::reader::RecordReader;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record naming an authoritative name server for its owner.
/// [\[RFC 1035\]](https://www.rfc-editor.org/rfc/rfc1035)
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct NS {
    pub nsdname: Name,
}

impl RdataTrait for NS {
    fn parse_rdata(reader: &mut RecordReader, _rdlength: u16) -> Result<Rdata, ParseError> {
        Ok(Rdata::NS(Self {
            nsdname: reader.read_name()?,
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        self.nsdname.encode_into(buf)
    }
}

impl Display for NS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.nsdname)
    }
}
