//! Feature detection on single channel images.
//!
//! - **Canny**: binary edge maps with hysteresis thresholding
//! - **Hough**: progressive probabilistic Hough transform for line segments

mod canny;
pub use canny::*;

mod hough;
pub use hough::*;
