//! Domain names.
//!
//! [`Name`] keeps the owner's spelling but compares, hashes and orders
//! without regard to ASCII case. Its `Ord` is the canonical order of
//! RFC 4034 section 6.1, which is the order of a signed zone's NSEC chain.

mod label;
mod parse;

pub use label::{Label, LabelIter};
pub use parse::{LabelBytes, split_labels};

use crate::error::{Error, Result};
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use compact_str::ToCompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Labels of one name, leftmost first.
type LabelStack<'a> = SmallVec<[Label<'a>; 8]>;

/// A fully qualified domain name.
///
/// Parsing `"example.com"` and `"example.com."` gives the same name, and
/// backslash escapes are decoded, so `a\.b.example.` has two labels.
///
/// ```rust
/// use zonehold_proto::name::Name;
/// use std::str::FromStr;
///
/// let name = Name::from_str("www.Example.com").unwrap();
/// assert_eq!(name.to_string(), "www.Example.com.");
/// assert_eq!(name, Name::from_str("WWW.EXAMPLE.COM.").unwrap());
/// assert!(Name::from_str("example.com").unwrap() < name);
/// ```
#[derive(Clone)]
pub struct Name {
    /// Each label as a length byte and its octets; no root terminator.
    packed: SmallVec<[u8; 48]>,
    count: u8,
}

impl Name {
    /// The root name, `.`.
    pub const ROOT: Self = Self {
        packed: SmallVec::new_const(),
        count: 0,
    };

    /// Builds a name from unescaped labels, leftmost first.
    ///
    /// # Errors
    ///
    /// Fails on an empty label, a label over 63 octets, or a name over 255
    /// octets in wire form.
    pub fn from_labels<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut name = Self::ROOT;
        for (position, label) in labels.into_iter().enumerate() {
            let label = label.as_ref();
            let len = u8::try_from(label.len())
                .ok()
                .filter(|&len| usize::from(len) <= MAX_LABEL_LENGTH)
                .ok_or_else(|| Error::label_too_long(label.len()))?;
            if len == 0 {
                return Err(Error::EmptyLabel { position });
            }

            name.packed.push(len);
            name.packed.extend_from_slice(label);
            if name.wire_len() > MAX_NAME_LENGTH {
                return Err(Error::name_too_long(name.wire_len()));
            }
            name.count += 1;
        }
        Ok(name)
    }

    /// Octets in uncompressed wire form, root byte included.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.packed.len() + 1
    }

    /// Labels, not counting the root.
    #[inline]
    pub const fn label_count(&self) -> usize {
        self.count as usize
    }

    /// The RRSIG labels field for this owner: the label count less a
    /// leading `*` (RFC 4034 section 3.1.3).
    pub fn rrsig_label_count(&self) -> u8 {
        self.count - u8::from(self.is_wildcard())
    }

    /// Returns true for `.`.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the leftmost label is `*`.
    pub fn is_wildcard(&self) -> bool {
        self.labels().next().is_some_and(|label| label.is_wildcard())
    }

    /// The labels, leftmost first.
    #[inline]
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter::new(&self.packed)
    }

    /// The label at `index`, counting from the left.
    pub fn label(&self, index: usize) -> Option<Label<'_>> {
        self.labels().nth(index)
    }

    /// The name with its leftmost label removed; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (&first, _) = self.packed.split_first()?;
        Some(Self {
            packed: SmallVec::from_slice(&self.packed[1 + usize::from(first)..]),
            count: self.count - 1,
        })
    }

    /// Returns true if this name is `ancestor` or lies below it.
    pub fn is_subdomain_of(&self, ancestor: &Name) -> bool {
        if self.count < ancestor.count {
            return false;
        }
        let ours = self.label_stack();
        let theirs = ancestor.label_stack();
        ours.iter().rev().zip(theirs.iter().rev()).all(|(a, b)| a == b)
    }

    /// The same name in ASCII lowercase.
    #[must_use]
    pub fn lowercased(&self) -> Self {
        // Length bytes never exceed 63, so lowercasing leaves them alone.
        let mut packed = self.packed.clone();
        packed.make_ascii_lowercase();
        Self {
            packed,
            count: self.count,
        }
    }

    fn label_stack(&self) -> LabelStack<'_> {
        self.labels().collect()
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_labels(split_labels(s)?)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        self.labels().try_for_each(|label| write!(f, "{label}."))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Name").field(&format_args!("{self}")).finish()
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::ROOT
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.packed.eq_ignore_ascii_case(&other.packed)
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.count);
        self.packed
            .iter()
            .for_each(|byte| state.write_u8(byte.to_ascii_lowercase()));
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Compares label by label from the right; a name sorts before its
    /// descendants.
    fn cmp(&self, other: &Self) -> Ordering {
        let ours = self.label_stack();
        let theirs = other.label_stack();
        ours.iter().rev().cmp(theirs.iter().rev())
    }
}

impl Serialize for Name {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_compact_string())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
