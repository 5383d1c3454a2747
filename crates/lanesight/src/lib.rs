#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Re-exports the image container, the image processing primitives and the
//! lane detector under a single crate.

#[doc(inline)]
pub use lanesight_image as image;

#[doc(inline)]
pub use lanesight_imgproc as imgproc;

#[doc(inline)]
pub use lanesight_detect as detect;
