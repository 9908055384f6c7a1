//! `NSEC` RDATA definition.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::Write;

use byteorder::WriteBytesExt;

use crate::error::{EncodeError, ParseError};
use crate::name::Name;
use crate::reader::RecordReader;
use crate::RecordType;

use super::{Rdata, RdataTrait};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A record listing the record types that exist at its owner.
/// [\[RFC 4034\]](https://www.rfc-editor.org/rfc/rfc4034)
///
/// mDNS responders use it without any DNSSEC meaning, to assert that the types absent from
/// [`Self::types`] do not exist for the owner
/// ([RFC 6762, Section 6.1](https://www.rfc-editor.org/rfc/rfc6762#section-6.1)). In that usage
/// [`Self::next_domain_name`] is the owner itself.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct NSEC {
    pub next_domain_name: Name,
    /// The types present at the owner, in ascending order when decoded.
    pub types: Vec<RecordType>,
}

impl NSEC {
    /// Reads type bitmap windows until `rdata_start + rdlength` is reached.
    fn parse_type_bitmap(
        reader: &mut RecordReader,
        rdata_start: usize,
        rdlength: u16,
    ) -> Result<Vec<RecordType>, ParseError> {
        let mut types = Vec::new();
        while reader.position() - rdata_start < rdlength as usize {
            let window = reader.read_u8()?;
            let bitmap_len = reader.read_u8()?;
            if !(1..=32).contains(&bitmap_len) {
                return Err(ParseError::InvalidTypeBitmap {
                    window,
                    length: bitmap_len,
                });
            }
            let bitmap = reader.read_bytes(bitmap_len as usize)?;

            for (octet_idx, octet) in bitmap.iter().enumerate() {
                for bit in 0..8u16 {
                    if octet & (0b1000_0000 >> bit) != 0 {
                        let code = ((window as u16) << 8) | (octet_idx as u16 * 8 + bit);
                        types.push(code.into());
                    }
                }
            }
        }
        Ok(types)
    }

    /// Writes the type bitmap for `types` into `buf`: one window per populated block of 256 type
    /// codes, in ascending block order, each trimmed after its last non-zero octet.
    ///
    /// Returns the number of written bytes on success.
    fn encode_type_bitmap_into(
        types: &[RecordType],
        buf: &mut impl Write,
    ) -> Result<u16, EncodeError> {
        let mut windows: BTreeMap<u8, [u8; 32]> = BTreeMap::new();
        for rtype in types {
            let code: u16 = (*rtype).into();
            let [window, offset] = code.to_be_bytes();
            windows.entry(window).or_insert([0; 32])[offset as usize / 8] |=
                0b1000_0000 >> (offset % 8);
        }

        let mut bytes_written = 0;
        for (window, bitmap) in windows {
            let len = match bitmap.iter().rposition(|octet| *octet != 0) {
                Some(last) => last + 1,
                None => continue,
            };
            buf.write_u8(window)?;
            buf.write_u8(len as u8)?;
            buf.write_all(&bitmap[..len])?;
            bytes_written += 2 + len as u16;
        }
        Ok(bytes_written)
    }
}

impl RdataTrait for NSEC {
    fn parse_rdata(reader: &mut RecordReader, rdlength: u16) -> Result<Rdata, ParseError> {
        let rdata_start = reader.position();
        let next_domain_name = reader.read_name()?;
        let types = NSEC::parse_type_bitmap(reader, rdata_start, rdlength)?;

        Ok(Rdata::NSEC(Self {
            next_domain_name,
            types,
        }))
    }

    fn encode_rdata_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        Ok(self.next_domain_name.encode_into(buf)?
            + Self::encode_type_bitmap_into(&self.types, buf)?)
    }
}

impl Display for NSEC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.next_domain_name)?;
        for rtype in &self.types {
            write!(f, " {}", rtype)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::name::Name;
    use crate::rdata::{Rdata, RdataTrait, NSEC};
    use crate::reader::RecordReader;
    use crate::RecordType;

    #[test]
    fn mdns_negative_response_bitmap() {
        // "host.local" asserting it only has A and AAAA
        let nsec = NSEC {
            next_domain_name: Name::new("host.local").unwrap(),
            types: vec![RecordType::A, RecordType::AAAA],
        };
        let encoded = nsec.encode().unwrap();

        assert_eq!(&encoded[12..], [0x00, 0x04, 0x40, 0x00, 0x00, 0x08]);

        let mut reader = RecordReader::new(&encoded);
        let rdata = reader
            .read_record(RecordType::NSEC, encoded.len() as u16)
            .unwrap();
        assert_eq!(rdata, Rdata::NSEC(nsec));
        assert_eq!(rdata.to_string(), "host.local A AAAA");
    }

    #[test]
    fn bitmap_longer_than_a_window_is_rejected() {
        // root next name, window 0 with 33 octets
        let mut msg = vec![0x00, 0x00, 33];
        msg.extend_from_slice(&[0xff; 33]);
        let mut reader = RecordReader::new(&msg);

        assert!(matches!(
            reader.read_record(RecordType::NSEC, msg.len() as u16),
            Err(ParseError::InvalidTypeBitmap {
                window: 0,
                length: 33
            })
        ));

        let mut reader = RecordReader::new(&[0x00, 0x00, 0x00]);
        assert!(matches!(
            reader.read_record(RecordType::NSEC, 3),
            Err(ParseError::InvalidTypeBitmap { length: 0, .. })
        ));
    }

    #[test]
    fn multiple_windows() {
        let nsec = NSEC {
            next_domain_name: Name::root(),
            types: vec![RecordType::Unknown(256), RecordType::SRV],
        };
        let encoded = nsec.encode().unwrap();

        // window 0 comes first even though SRV was listed second
        assert_eq!(
            encoded,
            [0x00, 0x00, 0x05, 0, 0, 0, 0, 0x40, 0x01, 0x01, 0x80]
        );

        let mut reader = RecordReader::new(&encoded);
        let rdata = reader
            .read_record(RecordType::NSEC, encoded.len() as u16)
            .unwrap();
        assert_eq!(
            rdata.as_nsec().unwrap().types,
            [RecordType::SRV, RecordType::Unknown(256)]
        );
    }
}
