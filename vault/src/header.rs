//! Header attribute lookup.
//!
//! Attributes are returned as a single human readable line,
//! in the same spirit as the element lines printed by `dicom-dump`:
//!
//! ```text
//! (0010,0010) PatientName PN: "Doe^John"
//! ```
use crate::container::Container;
use crate::tag::TagKey;
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_core::header::Header;
use dicom_core::{DicomValue, PrimitiveValue, VR};
use dicom_dictionary_std::StandardDataDictionary;
use dicom_object::mem::InMemElement;
use snafu::Snafu;
use std::fmt::Display;

/// The data set has no attribute under the given key.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("Tag not found: {}", key))]
pub struct TagNotFoundError {
    key: TagKey,
}

impl TagNotFoundError {
    pub fn key(&self) -> &TagKey {
        &self.key
    }
}

impl Container {
    /// Look up an attribute of the main data set and render it as text.
    ///
    /// Keys which are not made of exactly two parts never match.
    /// File meta group attributes are not part of the main data set.
    pub fn attribute(&self, key: &TagKey) -> Result<String, TagNotFoundError> {
        key.as_tag()
            .and_then(|tag| self.object().element(tag).ok())
            .map(render_element)
            .ok_or_else(|| TagNotFoundError { key: key.clone() })
    }
}

/// Render a data element as `tag alias VR: value`.
pub fn render_element<D>(elem: &InMemElement<D>) -> String
where
    D: DataDictionary + Clone,
{
    let alias = StandardDataDictionary
        .by_tag(elem.tag())
        .map(DataDictionaryEntry::alias)
        .unwrap_or("«Unknown Attribute»");

    let value = match elem.value() {
        DicomValue::Sequence(seq) => {
            let n = seq.items().len();
            format!("<sequence of {} item{}>", n, plural(n))
        }
        DicomValue::PixelSequence(seq) => {
            let n = seq.fragments().len();
            format!("<encapsulated pixel data, {} fragment{}>", n, plural(n))
        }
        DicomValue::Primitive(value) => render_value(value, elem.vr()),
    };

    format!("{} {} {}: {}", elem.tag(), alias, elem.vr(), value)
}

fn render_value(value: &PrimitiveValue, vr: VR) -> String {
    use PrimitiveValue::*;

    if matches!(
        vr,
        VR::OB | VR::OW | VR::OF | VR::OD | VR::OL | VR::OV | VR::UN
    ) && !matches!(value, Empty)
    {
        return format!("<{} bytes>", value.calculate_byte_len());
    }

    match value {
        Empty => "(no value)".to_string(),
        Str(s) => quote(s),
        Strs(values) => format_list(values.iter().map(|s| quote(s))),
        Tags(values) => format_list(values),
        U8(values) => format_list(values),
        I16(values) => format_list(values),
        U16(values) => format_list(values),
        I32(values) => format_list(values),
        U32(values) => format_list(values),
        I64(values) => format_list(values),
        U64(values) => format_list(values),
        F32(values) => format_list(values),
        F64(values) => format_list(values),
        Date(values) => format_list(values),
        Time(values) => format_list(values),
        DateTime(values) => format_list(values),
    }
}

fn quote(text: &str) -> String {
    format!(
        "\"{}\"",
        text.trim_end_matches(|c: char| c == ' ' || c == '\0')
    )
}

fn format_list<I>(values: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let pieces: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
    match pieces.len() {
        0 => "(no value)".to_string(),
        1 => pieces.into_iter().next().unwrap_or_default(),
        _ => format!("[{}]", pieces.join(", ")),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
