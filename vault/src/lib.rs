//! Storage and inspection of DICOM files.
//!
//! This crate holds the data handling behind the `dicom-vault-server`:
//!
//! - [`Storage`]: a flat, name-keyed file store;
//! - [`validate`](validate::validate): decode a freshly stored file,
//!   removing it again if it is not DICOM;
//! - [`TagKey`]: attribute keys parsed from text such as `0010,0010`;
//! - [`Container::attribute`]: header attribute lookup,
//!   rendered as a human readable line;
//! - [`Container::sample_array`] and [`normalize`]:
//!   raw pixel samples rescaled to 8 bits;
//! - [`png::encode`]: PNG output of the normalized image.
//!
//! # Example
//!
//! ```no_run
//! use dicom_vault::{normalize, png, Container, Storage, TagKey};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Storage::open("/tmp/dicom_files")?;
//! let container = Container::decode(&storage.load("scan.dcm")?)?;
//!
//! let key: TagKey = "0010,0010".parse()?;
//! println!("{}", container.attribute(&key)?);
//!
//! let image = normalize(&container.sample_array()?)?;
//! std::fs::write("scan.png", png::encode(&image)?)?;
//! # Ok(())
//! # }
//! ```
pub mod container;
pub mod header;
pub mod pixel;
pub mod png;
pub mod storage;
pub mod tag;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use container::{Container, DecodeError};
pub use header::TagNotFoundError;
pub use pixel::{normalize, NormalizeError, NormalizedImage, PixelError, SampleArray};
pub use storage::{sanitize_filename, Storage};
pub use tag::{ParseTagError, TagKey};
pub use validate::{validate, ValidateError};

/// Render an error along with all of its causes in a single line,
/// separated by `: `.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // some errors already include their cause in their own message
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::error_chain;
    use snafu::{ResultExt, Snafu};

    #[derive(Debug, Snafu)]
    enum Outer {
        #[snafu(display("Could not do the thing"))]
        Thing { source: std::io::Error },
        #[snafu(display("Wrapped: {}", source))]
        Echo { source: std::io::Error },
    }

    #[test]
    fn joins_causes() {
        let err = Err::<(), _>(std::io::Error::other("disk on fire"))
            .context(ThingSnafu)
            .unwrap_err();
        assert_eq!(error_chain(&err), "Could not do the thing: disk on fire");
    }

    #[test]
    fn does_not_repeat_causes() {
        let err = Err::<(), _>(std::io::Error::other("disk on fire"))
            .context(EchoSnafu)
            .unwrap_err();
        assert_eq!(error_chain(&err), "Wrapped: disk on fire");
    }
}
