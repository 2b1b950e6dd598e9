//! Textual attribute tag keys.
//!
//! A tag key is written as comma separated hexadecimal numbers,
//! such as `0010,0010` for _Patient's Name_.
//! Parsing constrains neither the (group, element) arity
//! nor the sign or width of each number:
//! such a key is still a valid key,
//! it just never matches an attribute in a data set.
use dicom_core::Tag;
use snafu::Snafu;
use std::fmt;
use std::str::FromStr;

/// An error returned when a tag key is not made of hexadecimal numbers.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display(
    "Invalid structure for tag, it should be (XXXX, XXXX) where each element is a hexademical value"
))]
pub struct ParseTagError {
    /// the offending token
    token: String,
}

impl ParseTagError {
    /// The part of the input which is not a hexadecimal number.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// A structural key naming one attribute in a DICOM data set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagKey(Vec<i128>);

impl TagKey {
    /// Parse a key from comma separated hexadecimal numbers.
    ///
    /// Each part may be surrounded by whitespace
    /// and carry a sign, a `0x` prefix
    /// and single underscores between digits.
    /// Numbers beyond the range of `i128` are rejected.
    pub fn parse(text: &str) -> Result<Self, ParseTagError> {
        text.split(',')
            .map(|token| {
                parse_hex(token).ok_or_else(|| ParseTagError {
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(TagKey)
    }

    /// The numbers in this key, in order.
    pub fn parts(&self) -> &[i128] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpret the key as a DICOM tag.
    ///
    /// Returns `None` unless the key has exactly two parts,
    /// both within the range of `u16`.
    pub fn as_tag(&self) -> Option<Tag> {
        match self.0[..] {
            [group, element] => Some(Tag(
                u16::try_from(group).ok()?,
                u16::try_from(element).ok()?,
            )),
            _ => None,
        }
    }
}

fn parse_hex(token: &str) -> Option<i128> {
    let text = token.trim();
    let (negative, text) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (prefixed, text) = match text.get(..2) {
        Some("0x" | "0X") => (true, &text[2..]),
        _ => (false, text),
    };
    // an underscore may also directly follow the prefix
    let text = match text.strip_prefix('_') {
        Some(rest) if prefixed => rest,
        _ => text,
    };

    let mut digits = String::with_capacity(text.len());
    for group in text.split('_') {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        digits.push_str(group);
    }

    let magnitude = u128::from_str_radix(&digits, 16).ok()?;
    if negative {
        0i128.checked_sub_unsigned(magnitude)
    } else {
        i128::try_from(magnitude).ok()
    }
}

impl FromStr for TagKey {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagKey::parse(s)
    }
}

impl From<Tag> for TagKey {
    fn from(tag: Tag) -> Self {
        TagKey(vec![tag.group().into(), tag.element().into()])
    }
}

impl From<(u16, u16)> for TagKey {
    fn from((group, element): (u16, u16)) -> Self {
        TagKey(vec![group.into(), element.into()])
    }
}

/// Tuple notation with decimal parts, e.g. `(16, 16)`.
impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        match &self.0[..] {
            [single] => write!(f, "{},", single)?,
            parts => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", part)?;
                }
            }
        }
        f.write_str(")")
    }
}
