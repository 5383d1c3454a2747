use lanesight_image::{Image, ImageError};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

// fixed point precision of the line walk
const SHIFT: i64 = 16;

/// Parameters of the probabilistic Hough line segment search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Distance resolution of the accumulator in pixels.
    pub rho: f32,
    /// Angle resolution of the accumulator in radians.
    pub theta: f32,
    /// Minimum number of accumulator votes to accept a line.
    pub threshold: u32,
    /// Minimum segment length in pixels, measured along x or y.
    pub min_line_length: u32,
    /// Maximum gap in pixels between two points of the same segment.
    pub max_line_gap: u32,
    /// Stop after this many segments have been found.
    pub max_lines: Option<usize>,
    /// Seed of the point visiting order.
    pub seed: u64,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 2.0,
            theta: 2.0f32.to_radians(),
            threshold: 10,
            min_line_length: 20,
            max_line_gap: 10,
            max_lines: None,
            seed: 0,
        }
    }
}

impl HoughParams {
    fn validate(&self) -> Result<(), ImageError> {
        if !(self.rho.is_finite() && self.rho > 0.0) {
            return Err(ImageError::InvalidParameter(
                "rho",
                format!("expected a positive resolution, got {}", self.rho),
            ));
        }
        if !(self.theta.is_finite() && self.theta > 0.0) {
            return Err(ImageError::InvalidParameter(
                "theta",
                format!("expected a positive resolution, got {}", self.theta),
            ));
        }
        if self.threshold == 0 {
            return Err(ImageError::InvalidParameter(
                "threshold",
                "expected at least one vote".to_string(),
            ));
        }
        Ok(())
    }
}

/// A line segment found by [`hough_lines_p`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoughSegment {
    /// Start point (x, y) in pixels.
    pub start: [usize; 2],
    /// End point (x, y) in pixels.
    pub end: [usize; 2],
    /// Number of edge pixels consumed along the segment.
    pub support: u32,
}

struct Accumulator {
    // (cos, sin) of every angle bin, scaled by 1 / rho
    trig: Vec<(f32, f32)>,
    num_rho: usize,
    rho_offset: i64,
    votes: Vec<u32>,
}

impl Accumulator {
    fn new(width: usize, height: usize, rho: f32, theta: f32) -> Self {
        let num_angle = ((std::f32::consts::PI / theta).round() as usize).max(1);
        let num_rho = (((width + height) * 2 + 1) as f32 / rho).round() as usize;
        let irho = 1.0 / rho;

        let trig = (0..num_angle)
            .map(|n| {
                let angle = n as f32 * theta;
                (angle.cos() * irho, angle.sin() * irho)
            })
            .collect();

        Self {
            trig,
            num_rho,
            rho_offset: (num_rho as i64 - 1) / 2,
            votes: vec![0; num_angle * num_rho],
        }
    }

    fn bins(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.trig.iter().enumerate().filter_map(move |(n, &(c, s))| {
            let r = (x as f32 * c + y as f32 * s).round() as i64 + self.rho_offset;
            (r >= 0 && (r as usize) < self.num_rho).then(|| (n, n * self.num_rho + r as usize))
        })
    }

    /// Vote for all lines through the point, returning the best bin and its votes.
    fn vote(&mut self, x: usize, y: usize) -> (usize, u32) {
        let cells = self.bins(x, y).collect::<Vec<_>>();
        let mut best = (0, 0);
        for (n, cell) in cells {
            self.votes[cell] += 1;
            if self.votes[cell] > best.1 {
                best = (n, self.votes[cell]);
            }
        }
        best
    }

    fn unvote(&mut self, x: usize, y: usize) {
        let cells = self.bins(x, y).map(|(_, cell)| cell).collect::<Vec<_>>();
        for cell in cells {
            self.votes[cell] = self.votes[cell].saturating_sub(1);
        }
    }
}

/// Fixed point walk along a line direction starting at a pixel.
#[derive(Clone, Copy)]
struct LineWalk {
    x0: i64,
    y0: i64,
    dx: i64,
    dy: i64,
    // true when x is the major axis and stepped by whole pixels
    x_major: bool,
}

impl LineWalk {
    fn new(x: usize, y: usize, angle: f32) -> Self {
        // direction of the line is orthogonal to its normal angle
        let a = -angle.sin();
        let b = angle.cos();
        let one = (1i64 << SHIFT) as f32;
        let half = 1i64 << (SHIFT - 1);

        if a.abs() > b.abs() {
            Self {
                x0: x as i64,
                y0: ((y as i64) << SHIFT) + half,
                dx: if a > 0.0 { 1 } else { -1 },
                dy: (b * one / a.abs()).round() as i64,
                x_major: true,
            }
        } else {
            Self {
                x0: ((x as i64) << SHIFT) + half,
                y0: y as i64,
                dx: (a * one / b.abs()).round() as i64,
                dy: if b > 0.0 { 1 } else { -1 },
                x_major: false,
            }
        }
    }

    /// Pixels visited in the forward (`k == 0`) or backward direction, until the image border.
    fn pixels(
        self,
        k: usize,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        let (dx, dy) = if k == 0 {
            (self.dx, self.dy)
        } else {
            (-self.dx, -self.dy)
        };

        (0i64..)
            .map(move |step| {
                let (px, py) = (self.x0 + step * dx, self.y0 + step * dy);
                if self.x_major {
                    (px, py >> SHIFT)
                } else {
                    (px >> SHIFT, py)
                }
            })
            .take_while(move |&(x, y)| x >= 0 && y >= 0 && x < width as i64 && y < height as i64)
            .map(|(x, y)| (x as usize, y as usize))
    }
}

/// Find line segments in a binary image with the progressive probabilistic Hough transform.
///
/// Non-zero pixels are visited in a pseudo-random order seeded by
/// [`HoughParams::seed`], so the output is deterministic for a given input.
/// Every visited pixel votes in the accumulator; once a bin reaches the
/// threshold the corresponding line is walked in both directions, tolerating
/// gaps of up to `max_line_gap` pixels. Segments long enough are accepted and
/// their pixels retracted from the accumulator. The support of a segment is
/// the number of edge pixels it consumed.
///
/// # Arguments
///
/// * `src` - The binary edge map, non-zero pixels are edges.
/// * `params` - The search parameters.
///
/// # Returns
///
/// The segments ordered by descending support, ties in detection order.
pub fn hough_lines_p(
    src: &Image<u8, 1>,
    params: &HoughParams,
) -> Result<Vec<HoughSegment>, ImageError> {
    params.validate()?;

    let (width, height) = (src.cols(), src.rows());
    let mut accumulator = Accumulator::new(width, height, params.rho, params.theta);

    let mut mask = src.as_slice().iter().map(|&v| v != 0).collect::<Vec<bool>>();
    let mut points = mask
        .iter()
        .enumerate()
        .filter_map(|(idx, &on)| on.then_some((idx % width, idx / width)))
        .collect::<Vec<_>>();

    let mut rng = StdRng::seed_from_u64(params.seed);
    points.shuffle(&mut rng);

    let min_length = params.min_line_length as usize;
    let max_gap = params.max_line_gap as usize;
    let mut segments = Vec::new();

    for (x, y) in points {
        // already consumed by a previous line
        if !mask[y * width + x] {
            continue;
        }

        let (best_angle, votes) = accumulator.vote(x, y);
        if votes < params.threshold {
            continue;
        }

        let walk = LineWalk::new(x, y, best_angle as f32 * params.theta);

        let mut line_end = [(x, y); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let mut gap = 0;
            for (px, py) in walk.pixels(k, width, height) {
                if mask[py * width + px] {
                    gap = 0;
                    *end = (px, py);
                } else {
                    gap += 1;
                    if gap > max_gap {
                        break;
                    }
                }
            }
        }

        let good_line = line_end[1].0.abs_diff(line_end[0].0) >= min_length
            || line_end[1].1.abs_diff(line_end[0].1) >= min_length;

        // consume the walked pixels, retracting their votes for accepted lines
        let mut support = 0;
        for (k, end) in line_end.iter().enumerate() {
            for (px, py) in walk.pixels(k, width, height) {
                let idx = py * width + px;
                if mask[idx] {
                    if good_line {
                        accumulator.unvote(px, py);
                    }
                    mask[idx] = false;
                    support += 1;
                }
                if (px, py) == *end {
                    break;
                }
            }
        }

        if good_line {
            segments.push(HoughSegment {
                start: [line_end[0].0, line_end[0].1],
                end: [line_end[1].0, line_end[1].1],
                support,
            });

            if params.max_lines.is_some_and(|max| segments.len() >= max) {
                break;
            }
        }
    }

    log::trace!("hough: {} segments found", segments.len());

    // stable: equal support keeps the detection order
    segments.sort_by(|a, b| b.support.cmp(&a.support));

    Ok(segments)
}
