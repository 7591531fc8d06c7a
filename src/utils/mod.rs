//! Utility functions for image processing
//!
//! - Grayscale conversion of RGBA sample buffers
//! - The desaturation transform used by the reader's retry pass

pub mod grayscale;
