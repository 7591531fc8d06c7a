//! QR payload reader
//!
//! Decodes an encoded image (PNG, JPEG, ...) into a 4-channel sample buffer
//! and hands it to a [`QrLocator`]. When nothing is found the image is
//! desaturated and the locator runs exactly once more on a fresh buffer.

use crate::error::VerificationError;
use crate::models::RawPayload;
use crate::utils::grayscale::{desaturate_rgba_in_place, luma, rgba_to_grayscale_parallel};
use image::DynamicImage;
use rqrr::PreparedImage;
use tracing::debug;

/// Row-major RGBA samples, 4 bytes per pixel.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl SampleBuffer {
    /// Build a buffer from decoded pixels.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            data: rgba.into_raw(),
            width: width as usize,
            height: height as usize,
        }
    }

    /// Wrap raw RGBA bytes. Returns `None` if the length does not match.
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> Option<Self> {
        if data.len() != width * height * 4 {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// Luminance at `(x, y)`, or `None` outside the buffer.
    pub fn luma_at(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some(luma(px[0], px[1], px[2]))
    }

    /// Replace every pixel with its opaque grayscale value.
    pub fn desaturate(&mut self) {
        desaturate_rgba_in_place(&mut self.data, self.width);
    }
}

/// Locates and decodes one QR symbol in a sample buffer.
pub trait QrLocator {
    /// Payload of the first decodable symbol, or `None` if there is none.
    fn locate(&self, samples: &SampleBuffer) -> Option<RawPayload>;
}

impl<L: QrLocator + ?Sized> QrLocator for &L {
    fn locate(&self, samples: &SampleBuffer) -> Option<RawPayload> {
        (**self).locate(samples)
    }
}

/// Locator backed by the `rqrr` grid detector.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrLocator;

impl QrLocator for RqrrLocator {
    fn locate(&self, samples: &SampleBuffer) -> Option<RawPayload> {
        let (width, height) = (samples.width(), samples.height());
        if width == 0 || height == 0 {
            return None;
        }
        let gray = rgba_to_grayscale_parallel(samples.as_rgba(), width, height);
        let mut prepared =
            PreparedImage::prepare_from_greyscale(width, height, |x, y| gray[y * width + x]);
        let grids = prepared.detect_grids();
        debug!(candidates = grids.len(), "qr grids detected");

        for grid in grids {
            let mut bytes = Vec::new();
            match grid.decode_to(&mut bytes) {
                Ok(_) => return Some(RawPayload::new(bytes)),
                Err(err) => debug!(error = ?err, "qr grid failed to decode"),
            }
        }
        None
    }
}

/// Decode `image_bytes` and return the payload of the QR symbol it shows.
pub fn read_payload<L: QrLocator + ?Sized>(
    image_bytes: &[u8],
    locator: &L,
) -> Result<RawPayload, VerificationError> {
    if image_bytes.is_empty() {
        return Err(VerificationError::ImageUnreadable("empty image buffer".into()));
    }
    let image = image::load_from_memory(image_bytes)
        .map_err(|err| VerificationError::ImageUnreadable(err.to_string()))?;
    debug!(width = image.width(), height = image.height(), "image loaded");

    let samples = SampleBuffer::from_image(&image);
    if let Some(payload) = locator.locate(&samples) {
        debug!(bytes = payload.len(), "qr decoded on first attempt");
        return Ok(payload);
    }
    drop(samples);

    debug!("first attempt found nothing, retrying on desaturated copy");
    let mut retry = SampleBuffer::from_image(&image);
    retry.desaturate();
    match locator.locate(&retry) {
        Some(payload) => {
            debug!(bytes = payload.len(), "qr decoded on grayscale attempt");
            Ok(payload)
        }
        None => Err(VerificationError::NoQrFound),
    }
}
