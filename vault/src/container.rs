//! Decoding stored bytes into a DICOM object.
use dicom_object::{DefaultDicomObject, ReadError};
use snafu::Snafu;
use tracing::debug;

/// Length of the DICOM file preamble preceding the magic code.
const PREAMBLE_LENGTH: usize = 128;
const MAGIC_CODE: &[u8; 4] = b"DICM";

/// The bytes given do not form a DICOM file.
#[derive(Debug, Snafu)]
#[snafu(display("{}", source))]
pub struct DecodeError {
    source: ReadError,
}

impl DecodeError {
    /// The full reason for the failure,
    /// including every underlying cause.
    pub fn reason(&self) -> String {
        crate::error_chain(self)
    }
}

/// A successfully decoded DICOM file.
///
/// The only way to obtain one is through [`Container::decode`],
/// so holding a container proves that the bytes were valid.
#[derive(Debug, Clone)]
pub struct Container {
    obj: DefaultDicomObject,
}

impl Container {
    /// Decode a DICOM file held in memory.
    ///
    /// Both a full file (128-byte preamble followed by `DICM`)
    /// and a stream starting right at the `DICM` magic code are accepted.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let data = match bytes.get(PREAMBLE_LENGTH..PREAMBLE_LENGTH + MAGIC_CODE.len()) {
            Some(magic) if magic == MAGIC_CODE => &bytes[PREAMBLE_LENGTH..],
            _ => bytes,
        };

        let obj = dicom_object::from_reader(data).map_err(|source| DecodeError { source })?;
        debug!(
            "Decoded DICOM object with transfer syntax {}",
            obj.meta().transfer_syntax()
        );
        Ok(Container { obj })
    }

    /// Read-only access to the decoded object.
    pub fn object(&self) -> &DefaultDicomObject {
        &self.obj
    }
}
