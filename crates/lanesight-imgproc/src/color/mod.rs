mod gray;
mod hsv;

pub use gray::gray_from_rgb;
pub use hsv::value_from_rgb;
