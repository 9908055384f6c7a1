//! `zeroconf-proto` provides the DNS message format as used by multicast DNS and DNS-based
//! service discovery: it decodes raw packets into [`Response`]s and encodes [`Request`]s and
//! [`Response`]s back into wire-exact bytes.
//!
//! It does not send or receive anything; transport, browsing and caching live in the layers above
//! it. The only time-aware part is TTL aging (see [`ResourceRecord::ttl()`]), which the caller
//! drives by reporting elapsed seconds.
//!
//! # Basic usage example
//! ```rust
//! use zeroconf_proto::{Class, Name, Question, RecordType, Request, Response};
//!
//! let mut request = Request::new();
//! request.add_question(Question::new(
//!     Name::new("_http._tcp.local").unwrap(),
//!     RecordType::PTR,
//!     Class::IN,
//! ));
//! let packet = request.encode().unwrap();
//!
//! // the query parses like any other message; QR is not set
//! let parsed = Response::parse(&packet).unwrap();
//! assert!(!parsed.is_query_response());
//! assert_eq!(parsed.questions[0].qname.to_string(), "_http._tcp.local");
//! ```
//!
//! # Usage note
//! The header counts of a [`Response`] are whatever was decoded or set. [`Response::encode()`]
//! and [`Request::encode()`] recompute them from the sections, so there is rarely a reason to
//! touch them by hand.

use std::cmp::max;
use std::fmt::{self, Display};
use std::io::Write;

use byteorder::{NetworkEndian, WriteBytesExt};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use rand::Rng;
use repr_with_fallback::repr_with_fallback;
#[cfg(feature = "serde")]
use serde::Serialize;
use strum_macros::EnumString;
use tracing::{debug, trace};

pub mod error;
pub mod name;
pub mod rdata;
pub mod reader;

use error::{EncodeError, ParseError};
use rdata::{A, AAAA, CNAME, HINFO, MX, NS, NSEC, PTR, SOA, SRV, TXT};

pub use name::Name;
pub use rdata::Rdata;
pub use reader::RecordReader;

/// The top bit of the CLASS field. mDNS reuses it as the cache-flush bit in resource records and
/// as the unicast-response bit in questions.
const CLASS_TOP_BIT: u16 = 1 << 15;

repr_with_fallback! {
    /// Represents a DNS TYPE.
    ///
    /// See the documentation in the [`rdata`] module for the types that have a typed
    /// representation. Every other code decodes as `Unknown` and its RDATA stays opaque.
    #[cfg_attr(feature = "serde", derive(Serialize))]
    #[derive(PartialEq, Eq, Copy, Clone, EnumString, Debug, Hash)]
    pub enum RecordType {
        A = 1,
        NS = 2,
        CNAME = 5,
        SOA = 6,
        PTR = 12,
        HINFO = 13,
        MX = 15,
        TXT = 16,
        AAAA = 28,
        SRV = 33,
        NSEC = 47,
        ANY = 255,
        Unknown(u16),
    }
}

repr_with_fallback! {
    /// Represents a DNS CLASS, without the mDNS top bit (see [`Question::unicast_response`] and
    /// [`ResourceRecord::cache_flush`]).
    ///
    /// See [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035) for further information.
    #[cfg_attr(feature = "serde", derive(Serialize))]
    #[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
    pub enum Class {
        IN = 1,
        CS = 2,
        CH = 3,
        HS = 4,
        NONE = 254,
        ANY = 255,
        Unknown(u16),
    }
}

repr_with_fallback! {
    /// Represents a DNS OpCode.
    ///
    /// See [here](https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-5) for
    /// further information. mDNS messages always use `QUERY`.
    #[cfg_attr(feature = "serde", derive(Serialize))]
    #[derive(PartialEq, Eq, Copy, Clone, Debug)]
    pub enum Opcode {
        QUERY = 0,
        IQUERY = 1,
        STATUS = 2,
        NOTIFY = 4,
        UPDATE = 5,
        DSO = 6,
        Unknown(u8),
    }
}

repr_with_fallback! {
    /// Represents the four-bit DNS RCODE of a [`Header`].
    ///
    /// See
    /// [here](https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-6)
    /// for further information.
    #[cfg_attr(feature = "serde", derive(Serialize))]
    #[derive(PartialEq, Eq, Copy, Clone, Debug)]
    pub enum RCode {
        NOERROR = 0,
        FORMERR = 1,
        SERVFAIL = 2,
        NXDOMAIN = 3,
        NOTIMP = 4,
        REFUSED = 5,
        YXDOMAIN = 6,
        YXRRSET = 7,
        NXRRSET = 8,
        NOTAUTH = 9,
        NOTZONE = 10,
        DSOTYPENI = 11,
        Unknown(u8),
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(x) => write!(f, "TYPE{}", x),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Default for Class {
    fn default() -> Self {
        Class::IN
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Class::Unknown(x) => write!(f, "CLASS{}", x),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Unknown(x) => write!(f, "OPCODE{}", x),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl Display for RCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RCode::Unknown(x) => write!(f, "RCODE{}", x),
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Represents the single-bit flags of a [`Header`].
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub struct HeaderFlags {
    /// authoritative answer; set on every mDNS response
    /// [\[RFC 6762\]](https://www.rfc-editor.org/rfc/rfc6762#section-18.4)
    pub aa: bool,
    /// truncated; in mDNS queries this means more known answers follow in another packet
    pub tc: bool,
    /// recursion desired
    pub rd: bool,
    /// recursion available
    pub ra: bool,
    /// reserved, kept so that every bit survives a round trip
    pub z: bool,
    /// authentic data [\[RFC 4035\]](https://www.rfc-editor.org/rfc/rfc4035)
    pub ad: bool,
    /// checking disabled [\[RFC 4035\]](https://www.rfc-editor.org/rfc/rfc4035)
    pub cd: bool,
}

impl HeaderFlags {
    /// Creates a `HeaderFlags` struct from bitflags as they would appear in the second 16-bit
    /// word of a [`Header`]. Bits that are not flags are ignored.
    pub fn from_flags(flags: u16) -> Self {
        Self {
            aa: (flags & (1 << 10)) != 0,
            tc: (flags & (1 << 9)) != 0,
            rd: (flags & (1 << 8)) != 0,
            ra: (flags & (1 << 7)) != 0,
            z: (flags & (1 << 6)) != 0,
            ad: (flags & (1 << 5)) != 0,
            cd: (flags & (1 << 4)) != 0,
        }
    }

    /// Returns a u16 representing bitflags as they would appear in the second 16-bit word of a
    /// [`Header`].
    pub fn as_flags(&self) -> u16 {
        [
            (self.aa, 10),
            (self.tc, 9),
            (self.rd, 8),
            (self.ra, 7),
            (self.z, 6),
            (self.ad, 5),
            (self.cd, 4),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .fold(0, |flags, (_, bit)| flags | (1 << bit))
    }
}

/// Represents the fixed 12-byte DNS header.
///
/// The general format of a header is defined in
/// [RFC 1035, Section 4.1.1](https://www.rfc-editor.org/rfc/rfc1035#section-4.1.1).
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Header {
    /// Supplied by the questioner and reflected back unchanged by the responder. Zero in
    /// multicast queries and responses.
    pub msg_id: u16,
    /// False for queries, true for responses.
    pub qr: bool,
    pub opcode: Opcode,
    pub flags: HeaderFlags,
    pub rcode: RCode,
    /// The number of questions.
    pub qdcount: u16,
    /// The number of answer records.
    pub ancount: u16,
    /// The number of authority records.
    pub nscount: u16,
    /// The number of additional records.
    pub arcount: u16,
}

impl Header {
    /// Creates a header for a query message with the given number of questions.
    pub fn new_query_header(msg_id: u16, opcode: Opcode, flags: HeaderFlags, qdcount: u16) -> Self {
        Header {
            msg_id,
            qr: false,
            opcode,
            flags,
            rcode: RCode::NOERROR,
            qdcount,
            ancount: 0,
            nscount: 0,
            arcount: 0,
        }
    }

    /// Creates a header for a response message.
    ///
    /// `qdcount`, `ancount`, `nscount` and `arcount` are grouped in that order in the `counts`
    /// parameter.
    pub fn new_response_header(
        msg_id: u16,
        opcode: Opcode,
        flags: HeaderFlags,
        rcode: RCode,
        counts: [u16; 4],
    ) -> Self {
        Header {
            msg_id,
            qr: true,
            opcode,
            flags,
            rcode,
            qdcount: counts[0],
            ancount: counts[1],
            nscount: counts[2],
            arcount: counts[3],
        }
    }

    /// Encodes a `Header` as 12 bytes.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::with_capacity(12);
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// The same as [`encode()`](Self::encode()), but encoded bytes are appended to the given writer
    /// instead of to a newly allocated one.
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<(), EncodeError> {
        let qr = if self.qr { 1u16 } else { 0u16 };
        let opcode = u8::from(self.opcode) as u16 & 0b1111;
        let rcode = u8::from(self.rcode) as u16 & 0b1111;

        let line_two = (qr << 15) | (opcode << 11) | self.flags.as_flags() | rcode;
        buf.write_u16::<NetworkEndian>(self.msg_id)?;
        buf.write_u16::<NetworkEndian>(line_two)?;
        buf.write_u16::<NetworkEndian>(self.qdcount)?;
        buf.write_u16::<NetworkEndian>(self.ancount)?;
        buf.write_u16::<NetworkEndian>(self.nscount)?;
        buf.write_u16::<NetworkEndian>(self.arcount)?;

        Ok(())
    }

    /// Parses a `Header` from the reader's current position.
    ///
    /// Unassigned opcodes and rcodes decode into their `Unknown` variants; only a short buffer is
    /// an error.
    pub fn parse(reader: &mut RecordReader) -> Result<Self, ParseError> {
        let msg_id = reader.read_u16()?;
        let line_two = reader.read_u16()?;

        Ok(Header {
            msg_id,
            qr: (line_two & (1 << 15)) != 0,
            opcode: (((line_two >> 11) & 0b1111) as u8).into(),
            flags: HeaderFlags::from_flags(line_two),
            rcode: ((line_two & 0b1111) as u8).into(),
            qdcount: reader.read_u16()?,
            ancount: reader.read_u16()?,
            nscount: reader.read_u16()?,
            arcount: reader.read_u16()?,
        })
    }

    /// Creates a string containing information (id, opcode, rcode for responses, flags) about the
    /// header.
    pub fn info_str(&self) -> String {
        let mut s = format!("id: {}, opcode: {}", self.msg_id, self.opcode);
        if self.qr {
            s.push_str(&format!(", rcode: {}", self.rcode));
        }

        let flags: Vec<_> = [
            (self.flags.aa, "aa"),
            (self.flags.tc, "tc"),
            (self.flags.rd, "rd"),
            (self.flags.ra, "ra"),
            (self.flags.z, "z"),
            (self.flags.ad, "ad"),
            (self.flags.cd, "cd"),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| *name)
        .collect();
        if !flags.is_empty() {
            s.push_str(", flags: ");
            s.push_str(&flags.join(" "));
        }
        s
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qr {
            write!(f, "DNS Response ({})", self.info_str())
        } else {
            write!(f, "DNS Query ({})", self.info_str())
        }
    }
}

/// Represents a DNS question, i.e. an entry in the question section of a DNS message.
///
/// See [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035) for further information.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Question {
    /// The [`Name`] to query for.
    pub qname: Name,
    /// The [`RecordType`] to query for.
    pub qtype: RecordType,
    /// The query [`Class`].
    pub qclass: Class,
    /// The mDNS "QU" bit: the querier would like a unicast reply.
    /// [\[RFC 6762\]](https://www.rfc-editor.org/rfc/rfc6762#section-5.4)
    pub unicast_response: bool,
}

impl Question {
    /// Creates a DNS question asking for a multicast reply.
    pub fn new(name: Name, qtype: RecordType, qclass: Class) -> Self {
        Question {
            qname: name,
            qtype,
            qclass,
            unicast_response: false,
        }
    }

    /// Encodes a `Question` as a series of bytes.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// The same as [`encode()`](Self::encode()), but encoded bytes are appended to the given writer
    /// instead of to a newly allocated one.
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<(), EncodeError> {
        self.qname.encode_into(buf)?;
        buf.write_u16::<NetworkEndian>(self.qtype.into())?;
        buf.write_u16::<NetworkEndian>(fold_class(self.qclass, self.unicast_response))?;
        Ok(())
    }

    /// Parses a `Question` from the reader's current position.
    pub fn parse(reader: &mut RecordReader) -> Result<Self, ParseError> {
        let qname = reader.read_name()?;
        let qtype: RecordType = reader.read_u16()?.into();
        let (qclass, unicast_response) = split_class(reader.read_u16()?);

        Ok(Question {
            qname,
            qtype,
            qclass,
            unicast_response,
        })
    }

    /// Returns a string representing the question, with the name padded to the given length.
    ///
    /// If `output` is [`Some`] and the specified output stream supports colours, the output will be
    /// colourized.
    pub fn as_padded_string(&self, owner_len: usize, output: Option<owo_colors::Stream>) -> String {
        let mut owner = format!("{:<width$}", self.qname.to_string(), width = owner_len);
        let mut qtype = self.qtype.to_string();
        if let Some(stream) = output {
            owner = owner.if_supports_color(stream, |s| s.green()).to_string();
            qtype = qtype.if_supports_color(stream, |s| s.purple()).to_string();
        }

        let qu = if self.unicast_response { " QU" } else { "" };
        format!("{}  {}  {}{}", owner, self.qclass, qtype, qu)
    }
}

impl Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DNS Question for '{}' (type: {}, class: {})",
            self.qname, self.qtype, self.qclass
        )
    }
}

/// Splits a raw CLASS value into the class proper and the mDNS top bit.
fn split_class(raw: u16) -> (Class, bool) {
    ((raw & !CLASS_TOP_BIT).into(), raw & CLASS_TOP_BIT != 0)
}

fn fold_class(class: Class, top_bit: bool) -> u16 {
    let class: u16 = class.into();
    if top_bit {
        class | CLASS_TOP_BIT
    } else {
        class
    }
}

/// The message section a [`ResourceRecord`] belongs to.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Section {
    Answer,
    Authority,
    Additional,
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Answer => write!(f, "Answer"),
            Section::Authority => write!(f, "Authority"),
            Section::Additional => write!(f, "Additional"),
        }
    }
}

/// Returns the TTL left after `elapsed_seconds`, saturating at zero.
///
/// # Examples
/// ```rust
/// use zeroconf_proto::effective_ttl;
///
/// assert_eq!(effective_ttl(100, 40), 60);
/// assert_eq!(effective_ttl(100, 150), 0);
/// ```
pub fn effective_ttl(base_ttl: u32, elapsed_seconds: u32) -> u32 {
    base_ttl.saturating_sub(elapsed_seconds)
}

/// Represents a DNS resource record, i.e. an entry in the answer, authority or additional section
/// of a DNS message.
///
/// The record type is always that of the contained [`Rdata`].
///
/// See [RFC 1035](https://www.rfc-editor.org/rfc/rfc1035) for further information.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ResourceRecord {
    /// The [`Name`] that this record is for.
    pub owner: Name,
    /// The class of this record, without the cache-flush bit.
    pub class: Class,
    /// The mDNS cache-flush bit: this record replaces all cached records of the same name, type
    /// and class. [\[RFC 6762\]](https://www.rfc-editor.org/rfc/rfc6762#section-10.2)
    pub cache_flush: bool,
    /// The TTL in seconds, as received or constructed.
    pub original_ttl: u32,
    /// Seconds this record has been held since it was received. Only advanced by the caller.
    pub time_lived: u32,
    /// The section this record was decoded from or is meant for.
    pub section: Section,
    rdata: Rdata,
}

impl ResourceRecord {
    /// Creates a record for the answer section, without the cache-flush bit.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::rdata::A;
    /// use zeroconf_proto::{Class, Name, RecordType, ResourceRecord};
    ///
    /// let record = ResourceRecord::new(
    ///     Name::new("foo.local").unwrap(),
    ///     Class::IN,
    ///     120,
    ///     A::new("10.0.0.5").into(),
    /// );
    /// assert_eq!(record.rtype(), RecordType::A);
    /// assert_eq!(record.to_string(), "foo.local 120 IN A 10.0.0.5");
    /// ```
    pub fn new(owner: Name, class: Class, ttl: u32, rdata: Rdata) -> Self {
        Self {
            owner,
            class,
            cache_flush: false,
            original_ttl: ttl,
            time_lived: 0,
            section: Section::Answer,
            rdata,
        }
    }

    /// Returns the type of this record.
    pub fn rtype(&self) -> RecordType {
        self.rdata.rtype()
    }

    /// Returns a reference to the contained [`Rdata`].
    pub fn rdata(&self) -> &Rdata {
        &self.rdata
    }

    /// Consumes the record and returns its [`Rdata`].
    pub fn into_rdata(self) -> Rdata {
        self.rdata
    }

    /// Returns the remaining TTL, i.e. [`Self::original_ttl`] minus [`Self::time_lived`], never
    /// less than zero.
    pub fn ttl(&self) -> u32 {
        effective_ttl(self.original_ttl, self.time_lived)
    }

    /// Adds `seconds` to [`Self::time_lived`].
    pub fn age(&mut self, seconds: u32) {
        self.time_lived = self.time_lived.saturating_add(seconds);
    }

    /// Returns true iff the remaining TTL is zero.
    pub fn is_expired(&self) -> bool {
        self.ttl() == 0
    }

    /// Encodes a `ResourceRecord` as a series of bytes.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// The same as [`encode()`](Self::encode()), but encoded bytes are appended to the given writer
    /// instead of to a newly allocated one.
    ///
    /// The remaining TTL is written, not the original one.
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<(), EncodeError> {
        let rdlength = self.rdata.rdlength()?;

        self.owner.encode_into(buf)?;
        buf.write_u16::<NetworkEndian>(self.rtype().into())?;
        buf.write_u16::<NetworkEndian>(fold_class(self.class, self.cache_flush))?;
        buf.write_u32::<NetworkEndian>(self.ttl())?;
        buf.write_u16::<NetworkEndian>(rdlength)?;
        self.rdata.encode_into(buf)?;
        Ok(())
    }

    /// Parses a `ResourceRecord` from the reader's current position.
    pub fn parse(reader: &mut RecordReader, section: Section) -> Result<Self, ParseError> {
        let owner = reader.read_name()?;
        let rtype: RecordType = reader.read_u16()?.into();
        let (class, cache_flush) = split_class(reader.read_u16()?);
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;
        let rdata = reader.read_record(rtype, rdlength)?;

        Ok(Self {
            owner,
            class,
            cache_flush,
            original_ttl: ttl,
            time_lived: 0,
            section,
            rdata,
        })
    }

    /// Returns a string representing the record in zone file format.
    ///
    /// If `separate_with_single_space` is true, all fields are separated by a single space;
    /// otherwise by two, with the TTL right-aligned in six characters.
    ///
    /// If `owner_len`/`rtype_len` is [`Some`], the `owner`/`rtype` field is padded to the specified
    /// length.
    ///
    /// If `output` is [`Some`] and the specified output stream supports colours, the output will
    /// be colourized.
    pub fn as_string(
        &self,
        separate_with_single_space: bool,
        owner_len: Option<usize>,
        rtype_len: Option<usize>,
        output: Option<owo_colors::Stream>,
    ) -> String {
        let mut owner = format!(
            "{:<width$}",
            self.owner.to_string(),
            width = owner_len.unwrap_or(0)
        );
        let mut rtype = format!(
            "{:<width$}",
            self.rtype().to_string(),
            width = rtype_len.unwrap_or(0)
        );

        if let Some(stream) = output {
            owner = owner.if_supports_color(stream, |s| s.green()).to_string();
            rtype = rtype.if_supports_color(stream, |s| s.purple()).to_string();
        }

        if separate_with_single_space {
            format!(
                "{} {} {} {} {}",
                owner,
                self.ttl(),
                self.class,
                rtype,
                self.rdata
            )
        } else {
            format!(
                "{}  {:>6}  {}  {}  {}",
                owner,
                self.ttl(),
                self.class,
                rtype,
                self.rdata
            )
        }
    }
}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string(true, None, None, None))
    }
}

/// A DNS query: a header and a list of questions.
///
/// QDCOUNT is derived from the questions on every encode.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Request {
    pub header: Header,
    questions: Vec<Question>,
}

impl Request {
    /// Creates an empty query with message ID 0, as multicast queries use
    /// ([RFC 6762, Section 18.1](https://www.rfc-editor.org/rfc/rfc6762#section-18.1)).
    pub fn new() -> Self {
        Self::with_id(0)
    }

    /// Creates an empty query with a random message ID, for unicast queries.
    pub fn with_random_id() -> Self {
        Self::with_id(rand::thread_rng().gen())
    }

    fn with_id(msg_id: u16) -> Self {
        Self {
            header: Header::new_query_header(msg_id, Opcode::QUERY, HeaderFlags::default(), 0),
            questions: Vec::new(),
        }
    }

    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Encodes the query: the header, with QDCOUNT set to the number of questions, followed by
    /// every question in order.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::{Class, Name, Question, RecordType, Request};
    ///
    /// let mut request = Request::new();
    /// request.add_question(Question::new(Name::new("foo.local").unwrap(), RecordType::A, Class::IN));
    ///
    /// let encoded = request.encode().unwrap();
    /// assert_eq!(&encoded[4..6], [0, 1]);
    /// assert_eq!(encoded.len(), 12 + 11 + 4);
    /// ```
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// The same as [`encode()`](Self::encode()), but encoded bytes are appended to the given writer
    /// instead of to a newly allocated one.
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<(), EncodeError> {
        let mut header = self.header.clone();
        header.qdcount = section_count(self.questions.len())?;

        header.encode_into(buf)?;
        for question in &self.questions {
            question.encode_into(buf)?;
        }
        Ok(())
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}

fn section_count(len: usize) -> Result<u16, EncodeError> {
    u16::try_from(len).map_err(|_| EncodeError::TooManyEntries(len))
}

/// A decoded DNS message plus the metadata of its reception.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Response {
    /// The message header, with the counts as decoded.
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
    /// A transport-level error description. Empty unless set by the caller.
    pub error: String,
    /// The length in bytes of the parsed packet; zero for responses built in memory.
    pub message_size: usize,
    /// When the packet was received (or the response created).
    pub timestamp: DateTime<Utc>,
}

impl Response {
    /// Creates an empty mDNS response: message ID 0, QR and AA set, timestamped now.
    pub fn new() -> Self {
        let flags = HeaderFlags {
            aa: true,
            ..Default::default()
        };
        Self {
            header: Header::new_response_header(0, Opcode::QUERY, flags, RCode::NOERROR, [0; 4]),
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
            error: String::new(),
            message_size: 0,
            timestamp: Utc::now(),
        }
    }

    /// Parses a complete DNS message, timestamped now.
    ///
    /// See [`Response::parse_received_at()`].
    pub fn parse(msg: &[u8]) -> Result<Self, ParseError> {
        Self::parse_received_at(msg, Utc::now())
    }

    /// Parses a complete DNS message received at `timestamp`.
    ///
    /// Reads the header and then exactly as many questions and records as its counts announce.
    /// Any failure aborts the whole parse. Bytes after the last announced record are ignored.
    pub fn parse_received_at(msg: &[u8], timestamp: DateTime<Utc>) -> Result<Self, ParseError> {
        trace!(size = msg.len(), "parsing DNS message");
        let mut reader = RecordReader::new(msg);
        let header = Header::parse(&mut reader)?;
        debug!(
            id = header.msg_id,
            qr = header.qr,
            qdcount = header.qdcount,
            ancount = header.ancount,
            nscount = header.nscount,
            arcount = header.arcount,
            "parsed header"
        );

        let questions = (0..header.qdcount)
            .map(|_| Question::parse(&mut reader))
            .collect::<Result<Vec<_>, _>>()?;
        let answers = Response::parse_records(&mut reader, header.ancount, Section::Answer)?;
        let authorities = Response::parse_records(&mut reader, header.nscount, Section::Authority)?;
        let additionals =
            Response::parse_records(&mut reader, header.arcount, Section::Additional)?;

        if reader.remaining() > 0 {
            trace!(trailing = reader.remaining(), "ignoring bytes after last record");
        }

        Ok(Response {
            header,
            questions,
            answers,
            authorities,
            additionals,
            error: String::new(),
            message_size: msg.len(),
            timestamp,
        })
    }

    fn parse_records(
        reader: &mut RecordReader,
        count: u16,
        section: Section,
    ) -> Result<Vec<ResourceRecord>, ParseError> {
        (0..count)
            .map(|_| ResourceRecord::parse(reader, section))
            .collect()
    }

    /// Returns the header's QR flag: true iff this message is a response.
    pub fn is_query_response(&self) -> bool {
        self.header.qr
    }

    /// Iterates over the answer, authority and additional records, in that order.
    pub fn resource_records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers
            .iter()
            .chain(self.authorities.iter())
            .chain(self.additionals.iter())
    }

    /// Advances the time lived of every record by `seconds`.
    pub fn age(&mut self, seconds: u32) {
        for record in self
            .answers
            .iter_mut()
            .chain(self.authorities.iter_mut())
            .chain(self.additionals.iter_mut())
        {
            record.age(seconds);
        }
    }

    fn answer_rdata<'a, T: 'a>(&'a self, view: impl Fn(&'a Rdata) -> Option<&'a T>) -> Vec<&'a T> {
        self.answers
            .iter()
            .filter_map(|record| view(record.rdata()))
            .collect()
    }

    /// The `A` RDATA of the answer section, in order.
    pub fn records_a(&self) -> Vec<&A> {
        self.answer_rdata(Rdata::as_a)
    }

    pub fn records_aaaa(&self) -> Vec<&AAAA> {
        self.answer_rdata(Rdata::as_aaaa)
    }

    pub fn records_ptr(&self) -> Vec<&PTR> {
        self.answer_rdata(Rdata::as_ptr)
    }

    pub fn records_txt(&self) -> Vec<&TXT> {
        self.answer_rdata(Rdata::as_txt)
    }

    pub fn records_srv(&self) -> Vec<&SRV> {
        self.answer_rdata(Rdata::as_srv)
    }

    pub fn records_mx(&self) -> Vec<&MX> {
        self.answer_rdata(Rdata::as_mx)
    }

    pub fn records_cname(&self) -> Vec<&CNAME> {
        self.answer_rdata(Rdata::as_cname)
    }

    pub fn records_ns(&self) -> Vec<&NS> {
        self.answer_rdata(Rdata::as_ns)
    }

    pub fn records_soa(&self) -> Vec<&SOA> {
        self.answer_rdata(Rdata::as_soa)
    }

    pub fn records_hinfo(&self) -> Vec<&HINFO> {
        self.answer_rdata(Rdata::as_hinfo)
    }

    pub fn records_nsec(&self) -> Vec<&NSEC> {
        self.answer_rdata(Rdata::as_nsec)
    }

    /// Encodes the header and the answer section only, for relaying answers.
    ///
    /// ANCOUNT is set to the number of answers; QDCOUNT, NSCOUNT and ARCOUNT are written as
    /// stored even though those sections are left out. Use [`Response::encode()`] for a complete
    /// message.
    pub fn to_byte_array(&self) -> Result<Vec<u8>, EncodeError> {
        let mut header = self.header.clone();
        header.ancount = section_count(self.answers.len())?;

        let mut buf = Vec::new();
        header.encode_into(&mut buf)?;
        for answer in &self.answers {
            answer.encode_into(&mut buf)?;
        }
        Ok(buf)
    }

    /// Encodes the complete message, with all four header counts set from the sections.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// The same as [`encode()`](Self::encode()), but encoded bytes are appended to the given writer
    /// instead of to a newly allocated one.
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<(), EncodeError> {
        let mut header = self.header.clone();
        header.qdcount = section_count(self.questions.len())?;
        header.ancount = section_count(self.answers.len())?;
        header.nscount = section_count(self.authorities.len())?;
        header.arcount = section_count(self.additionals.len())?;

        header.encode_into(buf)?;
        for question in &self.questions {
            question.encode_into(buf)?;
        }
        for record in self.resource_records() {
            record.encode_into(buf)?;
        }
        Ok(())
    }

    /// Returns a string verbosely describing the message (i.e. header and all the other sections).
    ///
    /// If `output` is [`Some`] and the specified output stream supports colours, the output will
    /// be colourized.
    pub fn as_string(&self, output: Option<owo_colors::Stream>) -> String {
        let section_name = |s: &str| match output {
            Some(stream) => s.if_supports_color(stream, |s| s.yellow()).to_string(),
            None => s.to_string(),
        };

        let mut max_owner_len = 0;
        let mut max_type_len = 0;
        for q in &self.questions {
            max_owner_len = max(max_owner_len, q.qname.to_string().len());
            max_type_len = max(max_type_len, q.qtype.to_string().len());
        }
        for record in self.resource_records() {
            max_owner_len = max(max_owner_len, record.owner.to_string().len());
            max_type_len = max(max_type_len, record.rtype().to_string().len());
        }

        let mut res = String::new();
        res.push_str(&section_name("Header:\n\t"));
        res.push_str(&format!("{}\n", self.header.info_str()));

        if !self.questions.is_empty() {
            res.push_str(&section_name("\nQuestion Section:\n"));
            for question in &self.questions {
                res.push('\t');
                res.push_str(&question.as_padded_string(max_owner_len, output));
                res.push('\n');
            }
        }

        let sections = [
            ("\nAnswer Section:\n", &self.answers),
            ("\nAuthority Section:\n", &self.authorities),
            ("\nAdditional Section:\n", &self.additionals),
        ];
        for (name, records) in sections {
            if records.is_empty() {
                continue;
            }
            res.push_str(&section_name(name));
            for record in records {
                res.push('\t');
                res.push_str(&record.as_string(
                    false,
                    Some(max_owner_len),
                    Some(max_type_len),
                    output,
                ));
                res.push('\n');
            }
        }

        res
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string(None))
    }
}
