//! Presentation-format parsing for domain names.
//!
//! Splits dotted names into labels while honouring the RFC 1035 section 5.1
//! escapes: `\X` stands for the literal character `X` and `\DDD` for the octet
//! with decimal value `DDD`. An escaped dot is part of its label and never a
//! separator.

use crate::error::{Error, Result};
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use smallvec::SmallVec;

/// Raw bytes of one unescaped label.
pub type LabelBytes = SmallVec<[u8; 24]>;

/// Splits a presentation-format name into unescaped labels.
///
/// The empty string and `"."` both denote the root and yield no labels. A
/// trailing dot is optional; names are always treated as fully qualified.
///
/// # Example
///
/// ```rust
/// use zonehold_proto::name::split_labels;
///
/// let labels = split_labels(r"a\.b.example.").unwrap();
/// assert_eq!(labels.len(), 2);
/// assert_eq!(labels[0].as_slice(), b"a.b");
/// ```
pub fn split_labels(input: &str) -> Result<Vec<LabelBytes>> {
    if input.is_empty() || input == "." {
        return Ok(Vec::new());
    }

    let bytes = input.as_bytes();
    let mut labels: Vec<LabelBytes> = Vec::new();
    let mut current = LabelBytes::new();
    // Wire length of the labels seen so far, plus the root byte.
    let mut wire_len = 1usize;
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        match byte {
            b'.' => {
                if current.is_empty() {
                    return Err(Error::EmptyLabel {
                        position: labels.len(),
                    });
                }
                wire_len += 1 + current.len();
                if wire_len > MAX_NAME_LENGTH {
                    return Err(Error::name_too_long(wire_len));
                }
                labels.push(std::mem::take(&mut current));
                pos += 1;
            }
            b'\\' => {
                let (value, consumed) = parse_escape(bytes, pos)?;
                current.push(value);
                pos += consumed;
            }
            0x21..=0x7E => {
                current.push(byte);
                pos += 1;
            }
            _ => {
                let character = input[pos..].chars().next().unwrap_or('\u{FFFD}');
                return Err(Error::InvalidLabelChar {
                    character,
                    position: current.len(),
                });
            }
        }

        if current.len() > MAX_LABEL_LENGTH {
            return Err(Error::label_too_long(current.len()));
        }
    }

    if !current.is_empty() {
        wire_len += 1 + current.len();
        if wire_len > MAX_NAME_LENGTH {
            return Err(Error::name_too_long(wire_len));
        }
        labels.push(current);
    }

    Ok(labels)
}

/// Decodes the escape starting at `start` (which holds the backslash).
///
/// Returns the decoded octet and the number of input bytes consumed.
fn parse_escape(bytes: &[u8], start: usize) -> Result<(u8, usize)> {
    let Some(&first) = bytes.get(start + 1) else {
        return Err(Error::invalid_escape(start, "dangling backslash"));
    };

    if !first.is_ascii_digit() {
        if !first.is_ascii() {
            return Err(Error::invalid_escape(start, "escaped non-ASCII character"));
        }
        return Ok((first, 2));
    }

    let digits = bytes
        .get(start + 1..start + 4)
        .filter(|d| d.iter().all(u8::is_ascii_digit))
        .ok_or_else(|| Error::invalid_escape(start, "decimal escape needs three digits"))?;

    let value = digits
        .iter()
        .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
    let value = u8::try_from(value)
        .map_err(|_| Error::invalid_escape(start, format!("decimal escape {value} exceeds 255")))?;

    Ok((value, 4))
}
