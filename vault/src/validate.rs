//! Validation of freshly stored files.
use crate::container::{Container, DecodeError};
use crate::storage::{self, Storage};
use snafu::{Report, ResultExt, Snafu};
use tracing::{debug, warn};

#[derive(Debug, Snafu)]
pub enum ValidateError {
    /// The stored file is not a DICOM file
    /// and has been removed from storage.
    #[snafu(display("{} is not a valid DICOM file: {}", name, source))]
    Format { name: String, source: DecodeError },
    /// The file could not be read back from storage.
    #[snafu(display("Could not load {}", name))]
    Load {
        name: String,
        source: storage::Error,
    },
}

/// Check that the file just saved under `name` decodes as DICOM.
///
/// On decoding failure the file is deleted from storage
/// before the error is returned,
/// so that no invalid file remains resident.
pub fn validate(storage: &Storage, name: &str) -> Result<Container, ValidateError> {
    let bytes = storage.load(name).context(LoadSnafu { name })?;

    match Container::decode(&bytes) {
        Ok(container) => {
            debug!("{} is a valid DICOM file", name);
            Ok(container)
        }
        Err(source) => {
            if let Err(e) = storage.delete(name) {
                warn!("Could not remove invalid file: {}", Report::from_error(e));
            }
            Err(source).context(FormatSnafu { name })
        }
    }
}
