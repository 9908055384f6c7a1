//! Sequential decoding of DNS messages.

use byteorder::{ByteOrder, NetworkEndian};
use tracing::debug;

use crate::error::ParseError;
use crate::name::{Name, MAX_NAME_LEN};
use crate::rdata::Rdata;
use crate::RecordType;

/// A cursor over a complete DNS message.
///
/// All reads are big-endian and advance the cursor. A read that would go past the current read
/// limit fails with [`ParseError::TruncatedMessage`]. The limit is the end of the message, except
/// while [`RecordReader::read_record()`] is decoding RDATA, where it is the end of that RDATA.
///
/// The reader always keeps the whole message around, because compression pointers inside names
/// refer to absolute offsets from its start.
///
/// # Examples
/// ```rust
/// use zeroconf_proto::RecordReader;
///
/// let msg = b"\x12\x34\x03foo\x05local\0";
/// let mut reader = RecordReader::new(msg);
///
/// assert_eq!(reader.read_u16().unwrap(), 0x1234);
/// assert_eq!(reader.read_name().unwrap().to_string(), "foo.local");
/// assert_eq!(reader.remaining(), 0);
/// assert!(reader.read_u8().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct RecordReader<'a> {
    msg: &'a [u8],
    position: usize,
    limit: usize,
}

impl<'a> RecordReader<'a> {
    /// Creates a reader positioned at the start of `msg`.
    pub fn new(msg: &'a [u8]) -> Self {
        Self {
            msg,
            position: 0,
            limit: msg.len(),
        }
    }

    /// Returns the current offset from the start of the message.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes left before the current read limit.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.position)
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a big-endian 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16, ParseError> {
        Ok(NetworkEndian::read_u16(self.read_bytes(2)?))
    }

    /// Reads a big-endian 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32, ParseError> {
        Ok(NetworkEndian::read_u32(self.read_bytes(4)?))
    }

    /// Reads the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ParseError> {
        if len > self.remaining() {
            return Err(ParseError::TruncatedMessage);
        }
        let msg = self.msg;
        let bytes = &msg[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    /// Reads a (possibly compressed) domain name.
    ///
    /// Each compression pointer has to point strictly before the start of the name (for the first
    /// pointer) or strictly before the target of the previous pointer. This rules out loops and
    /// bounds the walk by the length of the message. Violations, as well as running off the end of
    /// the message after following a pointer, are reported as [`ParseError::MalformedName`].
    ///
    /// Afterwards the cursor sits behind the terminating zero byte, or behind the first pointer if
    /// there was one.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::RecordReader;
    ///
    /// // "local" at offset 0, then "foo" followed by a pointer to offset 0
    /// let msg = b"\x05local\0\x03foo\xc0\x00";
    /// let mut reader = RecordReader::new(msg);
    ///
    /// assert_eq!(reader.read_name().unwrap().to_string(), "local");
    /// assert_eq!(reader.read_name().unwrap().to_string(), "foo.local");
    /// assert_eq!(reader.position(), msg.len());
    /// ```
    pub fn read_name(&mut self) -> Result<Name, ParseError> {
        let mut name = Name::root();
        let mut encoded_len = 1;
        let mut cursor = self.position;
        // every pointer target must be smaller than this
        let mut bound = self.position;
        let mut jumped = false;

        loop {
            let len = self.name_bytes(cursor, 1, jumped)?[0];
            cursor += 1;

            match len & 0b1100_0000 {
                0b1100_0000 => {
                    let low = self.name_bytes(cursor, 1, jumped)?[0];
                    let target = (((len & 0b0011_1111) as usize) << 8) | low as usize;
                    if target >= bound {
                        debug!(
                            offset = cursor - 1,
                            target, "rejected non-backward compression pointer"
                        );
                        return Err(ParseError::MalformedName(cursor - 1));
                    }
                    if !jumped {
                        self.position = cursor + 1;
                        jumped = true;
                    }
                    bound = target;
                    cursor = target;
                }
                0 => {
                    if len == 0 {
                        if !jumped {
                            self.position = cursor;
                        }
                        return Ok(name);
                    }

                    let len = len as usize;
                    encoded_len += len + 1;
                    if encoded_len > MAX_NAME_LEN {
                        return Err(ParseError::NameTooLong(encoded_len));
                    }
                    name.push_wire_label(self.name_bytes(cursor, len, jumped)?);
                    cursor += len;
                }
                _ => return Err(ParseError::InvalidLabelType(len)),
            }
        }
    }

    /// Decodes `rdlength` bytes of RDATA of the given type.
    ///
    /// Reads are limited to the RDATA while the decoder runs; names inside it may still point to
    /// earlier parts of the message. Types without a decoder become [`Rdata::Unknown`].
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::{RecordReader, RecordType};
    ///
    /// let mut reader = RecordReader::new(&[10, 0, 0, 5]);
    /// let rdata = reader.read_record(RecordType::A, 4).unwrap();
    ///
    /// assert_eq!(rdata.as_a().unwrap().address, "10.0.0.5");
    /// ```
    pub fn read_record(&mut self, rtype: RecordType, rdlength: u16) -> Result<Rdata, ParseError> {
        if rdlength as usize > self.remaining() {
            return Err(ParseError::TruncatedMessage);
        }

        let start = self.position;
        let outer_limit = std::mem::replace(&mut self.limit, start + rdlength as usize);
        let rdata = Rdata::parse(rtype, self, rdlength);
        self.limit = outer_limit;
        let rdata = rdata?;

        let consumed = self.position - start;
        if consumed != rdlength as usize {
            return Err(ParseError::RdlengthMismatch {
                rtype,
                rdlength,
                consumed,
            });
        }
        Ok(rdata)
    }

    /// Returns `len` bytes starting at `start` for the name walk. Before the first jump the read
    /// limit applies; after it, only the end of the message does.
    fn name_bytes(&self, start: usize, len: usize, jumped: bool) -> Result<&'a [u8], ParseError> {
        let msg = self.msg;
        let end = start + len;
        if jumped {
            msg.get(start..end).ok_or(ParseError::MalformedName(start))
        } else if end > self.limit {
            Err(ParseError::TruncatedMessage)
        } else {
            Ok(&msg[start..end])
        }
    }
}
