#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image basic operations module.
pub mod core;

/// utilities to draw on images.
pub mod draw;

/// feature detection module.
pub mod features;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

/// geometric transformations module.
pub mod warp;
