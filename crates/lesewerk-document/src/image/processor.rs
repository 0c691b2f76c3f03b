// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decodes uploads, wraps camera frames, optionally cleans
// pages up for recognition, and encodes the result as the PNG payload that
// travels through the pipeline. Uses the `image` and `imageproc` crates.

use image::{DynamicImage, ImageFormat, RgbaImage};
use lesewerk_core::error::LesewerkError;
use lesewerk_core::types::{ImageSource, RawFrame, SourceOrigin};
use tracing::{debug, info, instrument};

/// Image preparation pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`,
/// enabling method chaining.
///
/// ```ignore
/// let source = ImageProcessor::from_frame(frame)?
///     .prepare_for_recognition(true)
///     .into_source(SourceOrigin::Camera)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, LesewerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            LesewerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap a camera frame (tightly packed RGBA8).
    #[instrument(skip(frame), fields(width = frame.width, height = frame.height))]
    pub fn from_frame(frame: RawFrame) -> Result<Self, LesewerkError> {
        if !frame.is_well_formed() {
            return Err(LesewerkError::ImageError(format!(
                "camera frame has {} bytes, expected {}x{}x4",
                frame.rgba.len(),
                frame.width,
                frame.height
            )));
        }
        let RawFrame { width, height, rgba } = frame;
        let buffer = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
            LesewerkError::ImageError(format!("camera frame {}x{} is malformed", width, height))
        })?;
        Ok(Self {
            image: DynamicImage::ImageRgba8(buffer),
        })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        debug!("Converting to grayscale");
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Spread the luminance histogram across the full range. Faded print and
    /// dim camera frames come out with much clearer glyph edges.
    #[instrument(skip(self))]
    pub fn equalize(self) -> Self {
        debug!("Equalising histogram");
        let luma = self.image.to_luma8();
        let equalised = imageproc::contrast::equalize_histogram(&luma);
        Self {
            image: DynamicImage::ImageLuma8(equalised),
        }
    }

    /// Apply the optional clean-up steps run before recognition.
    pub fn prepare_for_recognition(self, preprocess: bool) -> Self {
        if preprocess {
            info!(
                width = self.width(),
                height = self.height(),
                "Preprocessing image for recognition"
            );
            self.grayscale().equalize()
        } else {
            self
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, LesewerkError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode as PNG and tag the payload with the producer that made it.
    pub fn into_source(self, origin: SourceOrigin) -> Result<ImageSource, LesewerkError> {
        let data = self.to_png_bytes()?;
        debug!(?origin, bytes = data.len(), "Image source ready");
        Ok(ImageSource::new(origin, data))
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, LesewerkError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        LesewerkError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}
