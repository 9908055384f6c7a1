//! Definition and implementation of the [`Name`] type.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use byteorder::WriteBytesExt;

use crate::error::{EncodeError, ParseError};

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// Maximum length of an encoded name in octets, including all length bytes and the root label.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a single label in octets.
pub const MAX_LABEL_LEN: usize = 63;

type Label = Vec<u8>;

/// A DNS domain name.
///
/// Labels are stored as the octets that appeared on the wire (or in the string the name was built
/// from), so case is preserved and a decoded name encodes back to the same bytes, even if a label
/// is not valid UTF-8.
/// Comparisons ignore ASCII case, as required by
/// [RFC 1035, Section 2.3.3](https://www.rfc-editor.org/rfc/rfc1035#section-2.3.3).
///
/// Unlike hostnames, DNS-SD service instance names may contain spaces, uppercase letters and
/// arbitrary UTF-8 (e.g. `"Living Room._airplay._tcp.local"`), so the only restrictions on a label
/// are that it is not empty, has at most 63 octets and contains no dot.
///
/// The string representation omits the trailing dot and replaces invalid UTF-8. The DNS root's
/// name is represented as the empty string.
#[derive(Eq, Clone, Debug)]
pub struct Name {
    // does not contain the root label, as that would be the empty string
    labels: VecDeque<Label>,
}

impl Name {
    /// Returns a `Name` representing the DNS root.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::Name;
    ///
    /// assert_eq!(Name::new(".").ok(), Some(Name::root()));
    /// assert_eq!(Name::root().to_string(), "");
    /// ```
    pub fn root() -> Self {
        Self {
            labels: VecDeque::new(),
        }
    }

    /// Constructs a `Name` from its dotted string representation.
    ///
    /// A trailing dot is allowed, but not necessary. `""` and `"."` both yield the root name.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::Name;
    ///
    /// assert!(Name::new("foo.local").is_ok());
    /// assert!(Name::new("foo.local.").is_ok());
    /// assert!(Name::new("Living Room._airplay._tcp.local").is_ok());
    ///
    /// assert!(Name::new("foo..local").is_err());
    /// assert!(Name::new(".local").is_err());
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, ParseError> {
        let name = name.as_ref();
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.is_empty() {
            return Ok(Self::root());
        }

        // + 1 for the leading length byte, + 1 for the root label
        let encoded_len = name.len() + 2;
        if encoded_len > MAX_NAME_LEN {
            return Err(ParseError::NameTooLong(encoded_len));
        }

        let mut labels = VecDeque::new();
        for label in name.split('.') {
            Name::check_label(label)?;
            labels.push_back(label.as_bytes().to_vec());
        }

        Ok(Name { labels })
    }

    /// Encodes this name as a sequence of labels into the given buffer. Does not use message
    /// compression.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// Returns an error if a label or the whole name is too long, or if writing to the buffer
    /// fails.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::Name;
    ///
    /// let mut buf = Vec::new();
    /// let name = Name::new("foo.local").unwrap();
    /// name.encode_into(&mut buf).ok();
    /// assert_eq!(buf, b"\x03foo\x05local\0");
    /// ```
    pub fn encode_into(&self, buf: &mut impl Write) -> Result<u16, EncodeError> {
        let encoded_len = self.encoded_len();
        if encoded_len > MAX_NAME_LEN {
            return Err(EncodeError::DomainTooLong(encoded_len));
        }

        for label in &self.labels {
            if label.len() > MAX_LABEL_LEN {
                return Err(EncodeError::LabelTooLong(label.len()));
            }
            buf.write_u8(label.len() as u8)?;
            buf.write_all(label)?;
        }
        buf.write_u8(0)?;
        Ok(encoded_len as u16)
    }

    /// Returns the number of octets [`Name::encode_into()`] writes for this name.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::Name;
    ///
    /// assert_eq!(Name::root().encoded_len(), 1);
    /// assert_eq!(Name::new("foo.local").unwrap().encoded_len(), 11);
    /// ```
    pub fn encoded_len(&self) -> usize {
        self.labels.iter().map(|label| label.len() + 1).sum::<usize>() + 1
    }

    /// Appends a label that was read from the wire, keeping its octets as they are.
    pub(crate) fn push_wire_label(&mut self, label: &[u8]) {
        self.labels.push_back(label.to_vec());
    }

    /// Appends the given `Name` to this `Name`.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::Name;
    ///
    /// let mut base = Name::new("printer").unwrap();
    /// base.append_name(Name::new("_ipp._tcp.local").unwrap());
    ///
    /// assert_eq!(base, Name::new("printer._ipp._tcp.local").unwrap());
    /// ```
    pub fn append_name(&mut self, mut other: Name) {
        self.labels.append(&mut other.labels)
    }

    /// Appends the given label to this `Name`.
    ///
    /// Returns an error if the label is empty or longer than 63 octets.
    pub fn append_label(&mut self, label: impl AsRef<str>) -> Result<(), ParseError> {
        Name::check_label(label.as_ref())?;
        self.labels.push_back(label.as_ref().as_bytes().to_vec());
        Ok(())
    }

    /// Prepends the given label to this `Name`.
    ///
    /// Returns an error if the label is empty or longer than 63 octets.
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::Name;
    ///
    /// let mut name = Name::new("_http._tcp.local").unwrap();
    /// name.prepend_label("My Web Server").unwrap();
    ///
    /// assert_eq!(name.to_string(), "My Web Server._http._tcp.local");
    /// ```
    pub fn prepend_label(&mut self, label: impl AsRef<str>) -> Result<(), ParseError> {
        Name::check_label(label.as_ref())?;
        self.labels.push_front(label.as_ref().as_bytes().to_vec());
        Ok(())
    }

    /// Removes and returns the first label of this `Name`, if it exists.
    pub fn pop_front_label(&mut self) -> Option<Label> {
        self.labels.pop_front()
    }

    /// Returns an iterator over the raw labels of this `Name`, leftmost first.
    pub fn labels(&self) -> impl Iterator<Item = &[u8]> {
        self.labels.iter().map(|label| label.as_slice())
    }

    /// Returns true iff this `Name` is a parent zone of `other` (or equal to it).
    ///
    /// # Examples
    /// ```rust
    /// use zeroconf_proto::Name;
    ///
    /// let local = Name::new("local").unwrap();
    /// let host = Name::new("foo.LOCAL").unwrap();
    ///
    /// assert!(local.zone_of(&host));
    /// assert!(!host.zone_of(&local));
    /// ```
    pub fn zone_of(&self, other: &Name) -> bool {
        if self.label_count() > other.label_count() {
            return false;
        }

        self.labels
            .iter()
            .rev()
            .zip(other.labels.iter().rev())
            .all(|(self_label, other_label)| self_label.eq_ignore_ascii_case(other_label))
    }

    /// Returns the number of labels of this `Name`; zero for the DNS root.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns true iff this `Name` represents the DNS root.
    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    fn check_label(label: &str) -> Result<(), ParseError> {
        if label.is_empty() {
            return Err(ParseError::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(ParseError::LabelTooLong(label.len()));
        }
        Ok(())
    }
}

impl FromStr for Name {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Name::new(s)
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders names by their most significant (rightmost) label first, comparing labels as octet
/// strings with ASCII case folded, as in
/// [RFC 4034, Section 6.1](https://www.rfc-editor.org/rfc/rfc4034#section-6.1).
impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut self_lbls = self.labels.iter().rev();
        let mut other_lbls = other.labels.iter().rev();

        loop {
            match (self_lbls.next(), other_lbls.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(self_lbl), Some(other_lbl)) => {
                    let self_lbl = self_lbl.iter().map(u8::to_ascii_lowercase);
                    let other_lbl = other_lbl.iter().map(u8::to_ascii_lowercase);
                    match self_lbl.cmp(other_lbl) {
                        Ordering::Equal => (),
                        unequal => return unequal,
                    }
                }
            }
        }
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, label) in self.labels.iter().enumerate() {
            if i != 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", String::from_utf8_lossy(label))?;
        }
        Ok(())
    }
}

/// Serializes the name as its string representation.
#[cfg(feature = "serde")]
impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_is_preserved_but_ignored_for_equality() {
        let upper = Name::new("Foo.LOCAL").unwrap();
        let lower = Name::new("foo.local").unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), "Foo.LOCAL");
    }

    #[test]
    fn overlong_labels_are_rejected() {
        let label = "a".repeat(64);
        assert!(matches!(
            Name::new(format!("{}.local", label)),
            Err(ParseError::LabelTooLong(64))
        ));
        assert!(Name::new(format!("{}.local", &label[..63])).is_ok());
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = vec!["abcdefghi"; 26].join(".");
        assert!(matches!(Name::new(&name), Err(ParseError::NameTooLong(_))));
    }

    #[test]
    fn wire_labels_encode_unchanged() {
        let mut label = vec![b'x'; 62];
        label.push(0xff);
        let mut name = Name::root();
        name.push_wire_label(&label);
        name.push_wire_label(b"local");

        let mut buf = Vec::new();
        assert_eq!(name.encode_into(&mut buf).unwrap(), 71);
        assert_eq!(buf[0], 63);
        assert_eq!(&buf[1..64], label.as_slice());
        assert_eq!(&buf[64..], b"\x05local\0");
        assert_eq!(name.to_string(), format!("{}\u{fffd}.local", "x".repeat(62)));
    }

    #[test]
    fn invalid_utf8_labels_compare_by_octets() {
        let mut lower = Name::root();
        lower.push_wire_label(&[b'a', 0xfe]);
        let mut upper = Name::root();
        upper.push_wire_label(&[b'A', 0xfe]);
        let mut other = Name::root();
        other.push_wire_label(&[b'a', 0xff]);

        assert_eq!(lower, upper);
        // both render as "a\u{fffd}" but still differ
        assert_ne!(lower, other);
        assert_eq!(lower.to_string(), other.to_string());
    }

    #[test]
    fn root_encodes_as_single_zero_byte() {
        let mut buf = Vec::new();
        assert_eq!(Name::root().encode_into(&mut buf).unwrap(), 1);
        assert_eq!(buf, [0]);
    }
}
