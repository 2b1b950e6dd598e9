//! PNG encoding of normalized images.
use crate::pixel::NormalizedImage;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use snafu::{OptionExt, ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum EncodeError {
    /// Only `[rows, columns]` (grayscale)
    /// and `[rows, columns, 3]` (RGB) arrays can be encoded.
    #[snafu(display("Cannot encode an image of shape {:?}", shape))]
    UnsupportedShape { shape: Vec<usize> },
    #[snafu(display("Could not write PNG image"))]
    WriteImage { source: image::ImageError },
}

/// Encode an 8-bit image as PNG.
pub fn encode(image: &NormalizedImage) -> Result<Vec<u8>, EncodeError> {
    let (rows, columns, color_type) = match *image.shape() {
        [rows, columns] => (rows, columns, ExtendedColorType::L8),
        [rows, columns, 3] => (rows, columns, ExtendedColorType::Rgb8),
        _ => return UnsupportedShapeSnafu { shape: image.shape() }.fail(),
    };
    let (width, height) = u32::try_from(columns)
        .ok()
        .zip(u32::try_from(rows).ok())
        .context(UnsupportedShapeSnafu { shape: image.shape() })?;

    // logical order, whatever the memory layout
    let data: Vec<u8> = image.iter().copied().collect();

    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&data, width, height, color_type)
        .context(WriteImageSnafu)?;
    Ok(out)
}
