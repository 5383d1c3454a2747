//! Geometric transformations of image coordinates.
//!
//! Only point mappings are provided: the lane pipeline maps a handful of
//! segment endpoints and never resamples a full image.

mod perspective;

pub use perspective::perspective_transform_point;
