//! Pixel sample extraction and normalization to 8 bits.
use crate::container::Container;
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use ndarray::{ArrayD, IxDyn};
use snafu::{ensure, ResultExt, Snafu};
use tracing::debug;

/// Raw pixel samples as stored in the file,
/// without any rescale applied.
///
/// Unit axes are dropped, so that a single frame grayscale image
/// has the shape `[rows, columns]`,
/// a multi-frame grayscale image `[frames, rows, columns]`,
/// and colour images carry a trailing samples axis.
pub type SampleArray = ArrayD<f64>;

/// Samples rescaled to the range 0 to 255, in the same shape.
pub type NormalizedImage = ArrayD<u8>;

#[derive(Debug, Snafu)]
pub enum PixelError {
    #[snafu(display("Could not decode pixel data"))]
    DecodePixelData { source: dicom_pixeldata::Error },
    #[snafu(display("Could not convert pixel data samples"))]
    ConvertSamples { source: dicom_pixeldata::Error },
    #[snafu(display("Pixel data does not fit in shape {:?}", shape))]
    Reshape {
        shape: Vec<usize>,
        source: ndarray::ShapeError,
    },
}

#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum NormalizeError {
    #[snafu(display("Pixel data is empty"))]
    Empty,
    #[snafu(display("Maximum sample value is not a finite number"))]
    NonFinite,
    /// An all-zero image has no scale to divide by.
    #[snafu(display("Cannot normalize by a maximum sample value of zero"))]
    ZeroMaximum,
}

impl Container {
    /// Decode the pixel data into an array of raw sample values.
    pub fn sample_array(&self) -> Result<SampleArray, PixelError> {
        let pixel = self
            .object()
            .decode_pixel_data()
            .context(DecodePixelDataSnafu)?;

        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
        let samples: Vec<f64> = pixel
            .to_vec_with_options(&options)
            .context(ConvertSamplesSnafu)?;

        let shape: Vec<usize> = [
            pixel.number_of_frames() as usize,
            pixel.rows() as usize,
            pixel.columns() as usize,
            pixel.samples_per_pixel() as usize,
        ]
        .into_iter()
        .enumerate()
        // rows and columns are always kept
        .filter(|&(axis, len)| len != 1 || axis == 1 || axis == 2)
        .map(|(_, len)| len)
        .collect();

        debug!("Decoded pixel data with shape {:?}", shape);
        ArrayD::from_shape_vec(IxDyn(&shape), samples).context(ReshapeSnafu { shape })
    }
}

/// Rescale samples so that the maximum value maps to 255.
///
/// Each sample becomes `sample / max * 255`, truncated toward zero
/// and then wrapped into 8 bits.
/// Results outside of 0 to 255 only arise from negative samples
/// or a negative maximum,
/// and wrap around the same way as an integer cast would.
pub fn normalize(samples: &SampleArray) -> Result<NormalizedImage, NormalizeError> {
    ensure!(!samples.is_empty(), EmptySnafu);

    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    ensure!(max.is_finite(), NonFiniteSnafu);
    ensure!(max != 0., ZeroMaximumSnafu);

    Ok(samples.mapv(|v| (v / max * 255.) as i64 as u8))
}
