//! RDATA type definitions.

use std::fmt::Display;
use std::io::Write;

use byteorder::WriteBytesExt;
use data_encoding::HEXUPPER;
use tracing::debug;

use crate::error::{EncodeError, ParseError};
use crate::reader::RecordReader;
use crate::RecordType;

#[cfg(feature = "serde")]
use serde::Serialize;

pub mod a;
pub mod aaaa;
pub mod cname;
pub mod hinfo;
pub mod mx;
pub mod ns;
pub mod nsec;
pub mod ptr;
pub mod soa;
pub mod srv;
pub mod txt;

pub use a::A;
pub use aaaa::AAAA;
pub use cname::CNAME;
pub use hinfo::HINFO;
pub use mx::MX;
pub use ns::NS;
pub use nsec::NSEC;
pub use ptr::PTR;
pub use soa::SOA;
pub use srv::SRV;
pub use txt::TXT;

/// The record data (RDATA) of a [`ResourceRecord`](crate::ResourceRecord).
///
/// Record types this crate has no decoder for (including `OPT`) are kept as
/// [`Rdata::Unknown`], which holds the type code and the raw RDATA bytes and writes them back
/// unchanged.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Rdata {
    A(A),
    NS(NS),
    CNAME(CNAME),
    SOA(SOA),
    PTR(PTR),
    HINFO(HINFO),
    MX(MX),
    TXT(TXT),
    AAAA(AAAA),
    SRV(SRV),
    NSEC(NSEC),

    /// RDATA of a type without a decoder: the type code and the raw bytes.
    Unknown(u16, Vec<u8>),
}

/// A trait for working with the different RDATA variants.
pub trait RdataTrait: Sized + Display {
    /// Parses `rdlength` bytes of RDATA, starting at the `reader`'s current position.
    ///
    /// The reader wraps the complete message, so names inside the RDATA can be decompressed.
    /// [`RecordReader::read_record()`] limits reads to the RDATA and checks afterwards that exactly
    /// `rdlength` bytes were consumed, so implementations don't have to.
    fn parse_rdata(reader: &mut RecordReader, rdlength: u16) -> Result<Rdata, ParseError>;

    /// Encodes the RDATA into the given `buf` and returns the number of written bytes on success.
    ///
    /// Names are always written uncompressed. If an error is returned, no guarantees for the state
    /// of `buf` are given.
    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError>;

    /// Encodes the RDATA and returns the encoded bytes.
    fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut rdata = Vec::new();
        self.encode_rdata_into(&mut rdata)?;
        Ok(rdata)
    }

    /// Returns the length of the encoded RDATA by running the encoder against a counting sink.
    fn rdlength(&self) -> Result<u16, EncodeError> {
        let mut counter = ByteCounter::default();
        self.encode_rdata_into(&mut counter)?;
        counter.len()
    }
}

/// A writer that discards its input and only counts it.
#[derive(Default)]
struct ByteCounter(usize);

impl ByteCounter {
    fn len(&self) -> Result<u16, EncodeError> {
        u16::try_from(self.0).map_err(|_| EncodeError::RdataTooLong(self.0))
    }
}

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0 += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[doc(hidden)]
macro_rules! impl_from_rtype {
    ($variant:ident) => {
        impl From<$variant> for Rdata {
            fn from(rdata: $variant) -> Self {
                Self::$variant(rdata)
            }
        }
    };
}

#[doc(hidden)]
macro_rules! impl_as_rtype {
    ($method:ident, $variant:ident, $doc:expr) => {
        #[doc = "Returns a reference to the inner [`"]
        #[doc = $doc]
        #[doc = "`] when called on the `"]
        #[doc = $doc]
        #[doc = "` variant. For all other variants, returns [`None`]."]
        pub fn $method(&self) -> Option<&$variant> {
            if let Self::$variant(inner) = self {
                Some(inner)
            } else {
                None
            }
        }
    };

    ($method:ident, $variant:ident) => {
        impl_as_rtype!($method, $variant, stringify!($variant));
    };
}

/// Match on every [`Rdata`] variant and execute a block for it.
///
/// Matches $self, using $arm as the match arm for the typed variants and $unknown_arm as the match
/// arm for [`Rdata::Unknown`]. $inner names the typed variant's content in $arm; $code and $data
/// name the type code and the raw bytes in $unknown_arm.
macro_rules! match_rdata {
    ($self:ident, $inner:ident, $arm:block, $code:pat, $data:ident, $unknown_arm:block) => {
        match $self {
            Rdata::A($inner) => $arm,
            Rdata::NS($inner) => $arm,
            Rdata::CNAME($inner) => $arm,
            Rdata::SOA($inner) => $arm,
            Rdata::PTR($inner) => $arm,
            Rdata::HINFO($inner) => $arm,
            Rdata::MX($inner) => $arm,
            Rdata::TXT($inner) => $arm,
            Rdata::AAAA($inner) => $arm,
            Rdata::SRV($inner) => $arm,
            Rdata::NSEC($inner) => $arm,
            Rdata::Unknown($code, $data) => $unknown_arm,
        }
    };
}

impl Rdata {
    /// Decodes `rdlength` bytes of RDATA of type `rtype`. Prefer
    /// [`RecordReader::read_record()`], which also enforces the RDATA boundaries.
    ///
    /// Types without a decoder are not an error: their bytes are kept in [`Rdata::Unknown`].
    pub fn parse(
        rtype: RecordType,
        reader: &mut RecordReader,
        rdlength: u16,
    ) -> Result<Self, ParseError> {
        match rtype {
            RecordType::A => A::parse_rdata(reader, rdlength),
            RecordType::NS => NS::parse_rdata(reader, rdlength),
            RecordType::CNAME => CNAME::parse_rdata(reader, rdlength),
            RecordType::SOA => SOA::parse_rdata(reader, rdlength),
            RecordType::PTR => PTR::parse_rdata(reader, rdlength),
            RecordType::HINFO => HINFO::parse_rdata(reader, rdlength),
            RecordType::MX => MX::parse_rdata(reader, rdlength),
            RecordType::TXT => TXT::parse_rdata(reader, rdlength),
            RecordType::AAAA => AAAA::parse_rdata(reader, rdlength),
            RecordType::SRV => SRV::parse_rdata(reader, rdlength),
            RecordType::NSEC => NSEC::parse_rdata(reader, rdlength),
            RecordType::ANY | RecordType::Unknown(_) => {
                debug!(%rtype, rdlength, "no decoder for record type, keeping RDATA opaque");
                let data = reader.read_bytes(rdlength as usize)?;
                Ok(Rdata::Unknown(rtype.into(), data.to_vec()))
            }
        }
    }

    /// See [`RdataTrait::encode()`].
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        match_rdata!(self, rdata, { rdata.encode() }, _, data, { Ok(data.clone()) })
    }

    /// See [`RdataTrait::encode_rdata_into()`].
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        match_rdata!(self, rdata, { rdata.encode_rdata_into(buf) }, _, data, {
            let len = opaque_len(data)?;
            buf.write_all(data)?;
            Ok(len)
        })
    }

    /// See [`RdataTrait::rdlength()`].
    pub fn rdlength(&self) -> Result<u16, EncodeError> {
        match_rdata!(self, rdata, { rdata.rdlength() }, _, data, { opaque_len(data) })
    }

    /// Returns the [`RecordType`] that matches this RDATA.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::{Rdata, RecordType};
    ///
    /// assert_eq!(Rdata::Unknown(41, vec![]).rtype(), RecordType::Unknown(41));
    /// ```
    pub fn rtype(&self) -> RecordType {
        match self {
            Rdata::A(_) => RecordType::A,
            Rdata::NS(_) => RecordType::NS,
            Rdata::CNAME(_) => RecordType::CNAME,
            Rdata::SOA(_) => RecordType::SOA,
            Rdata::PTR(_) => RecordType::PTR,
            Rdata::HINFO(_) => RecordType::HINFO,
            Rdata::MX(_) => RecordType::MX,
            Rdata::TXT(_) => RecordType::TXT,
            Rdata::AAAA(_) => RecordType::AAAA,
            Rdata::SRV(_) => RecordType::SRV,
            Rdata::NSEC(_) => RecordType::NSEC,
            Rdata::Unknown(code, _) => (*code).into(),
        }
    }

    /// Returns the raw bytes when called on the [`Rdata::Unknown`] variant. For all other
    /// variants, returns [`None`].
    pub fn as_unknown(&self) -> Option<&[u8]> {
        if let Self::Unknown(_, data) = self {
            Some(data)
        } else {
            None
        }
    }

    impl_as_rtype!(as_a, A);
    impl_as_rtype!(as_ns, NS);
    impl_as_rtype!(as_cname, CNAME);
    impl_as_rtype!(as_soa, SOA);
    impl_as_rtype!(as_ptr, PTR);
    impl_as_rtype!(as_hinfo, HINFO);
    impl_as_rtype!(as_mx, MX);
    impl_as_rtype!(as_txt, TXT);
    impl_as_rtype!(as_aaaa, AAAA);
    impl_as_rtype!(as_srv, SRV);
    impl_as_rtype!(as_nsec, NSEC);
}

impl_from_rtype!(A);
impl_from_rtype!(NS);
impl_from_rtype!(CNAME);
impl_from_rtype!(SOA);
impl_from_rtype!(PTR);
impl_from_rtype!(HINFO);
impl_from_rtype!(MX);
impl_from_rtype!(TXT);
impl_from_rtype!(AAAA);
impl_from_rtype!(SRV);
impl_from_rtype!(NSEC);

/// Renders RDATA in zone file presentation format; unknown RDATA uses the generic
/// `\# <length> <hex>` notation of [RFC 3597](https://www.rfc-editor.org/rfc/rfc3597#section-5).
impl Display for Rdata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match_rdata!(self, rdata, { write!(f, "{}", rdata) }, _, data, {
            if data.is_empty() {
                write!(f, "\\# 0")
            } else {
                write!(f, "\\# {} {}", data.len(), HEXUPPER.encode(data))
            }
        })
    }
}

fn opaque_len(data: &[u8]) -> Result<u16, EncodeError> {
    u16::try_from(data.len()).map_err(|_| EncodeError::RdataTooLong(data.len()))
}

/// Parses a character string as defined in [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035),
/// i.e. reads a length byte and then the number of bytes specified by the length byte.
///
/// The bytes are returned as they are. DNS-SD TXT values are opaque binary data
/// ([RFC 6763, Section 6.5](https://www.rfc-editor.org/rfc/rfc6763#section-6.5)).
///
/// Returns the parsed string and the number of bytes read.
pub fn parse_string(reader: &mut RecordReader) -> Result<(Vec<u8>, usize), ParseError> {
    let length = reader.read_u8()?;
    let string = reader.read_bytes(length as usize)?.to_vec();

    // + 1 because we also need to count the length byte
    Ok((string, length as usize + 1))
}

/// Encodes a string as a character string as defined in
/// [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035), i.e. writes the length of the string as a
/// byte and then the string bytes, into the given `buf`.
///
/// Returns an error if the string is longer than 255 bytes.
///
/// Returns the number of bytes written on success.
pub fn encode_string_into(
    string: impl AsRef<[u8]>,
    buf: &mut impl Write,
) -> Result<u16, EncodeError> {
    let string = string.as_ref();
    let len = u8::try_from(string.len()).map_err(|_| EncodeError::StringTooLong(string.len()))?;

    buf.write_u8(len)?;
    buf.write_all(string)?;
    Ok(1 + len as u16)
}

/// Writes a character string in quotes, escaping quotes and replacing invalid UTF-8.
pub(crate) fn write_quoted(f: &mut std::fmt::Formatter<'_>, string: &[u8]) -> std::fmt::Result {
    write!(f, "\"{}\"", String::from_utf8_lossy(string).replace('"', "\\\""))
}
