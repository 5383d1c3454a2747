use lanesight_imgproc::features::HoughSegment;

/// A straight line segment between two image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// x coordinate of the start point.
    pub x1: f64,
    /// y coordinate of the start point.
    pub y1: f64,
    /// x coordinate of the end point.
    pub x2: f64,
    /// y coordinate of the end point.
    pub y2: f64,
}

impl LineSegment {
    /// Create a segment from its two endpoints.
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self {
            x1: start[0],
            y1: start[1],
            x2: end[0],
            y2: end[1],
        }
    }

    /// The start point as `[x, y]`.
    pub fn start(&self) -> [f64; 2] {
        [self.x1, self.y1]
    }

    /// The end point as `[x, y]`.
    pub fn end(&self) -> [f64; 2] {
        [self.x2, self.y2]
    }

    /// Whether both endpoints share the same column.
    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    /// The image-plane slope `dy / dx`, `None` for a vertical segment.
    pub fn slope(&self) -> Option<f64> {
        (!self.is_vertical()).then(|| (self.y2 - self.y1) / (self.x2 - self.x1))
    }

    /// The row where the extended line crosses column zero, `None` for a vertical segment.
    pub fn y_intercept(&self) -> Option<f64> {
        self.slope().map(|m| self.y2 - m * self.x2)
    }
}

impl From<HoughSegment> for LineSegment {
    fn from(segment: HoughSegment) -> Self {
        let [x1, y1] = segment.start;
        let [x2, y2] = segment.end;
        Self::new([x1 as f64, y1 as f64], [x2 as f64, y2 as f64])
    }
}
