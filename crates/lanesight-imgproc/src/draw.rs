use lanesight_image::Image;

/// Helper function to set a pixel's color, ignoring pixels outside the image.
#[inline]
fn set_pixel<const C: usize>(img: &mut Image<u8, C>, x: i64, y: i64, color: [u8; C]) {
    if x >= 0 && x < img.cols() as i64 && y >= 0 && y < img.rows() as i64 {
        let start = (y as usize * img.cols() + x as usize) * C;
        img.as_slice_mut()[start..start + C].copy_from_slice(&color);
    }
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line, approximated with a square brush.
pub fn draw_line<const C: usize>(
    img: &mut Image<u8, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [u8; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;
    let half_thickness = thickness as i64 / 2;

    loop {
        for i in -half_thickness..=half_thickness {
            for j in -half_thickness..=half_thickness {
                set_pixel(img, x0 + i, y0 + j, color);
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Fills a polygon on an image inplace with a scanline rasterizer.
///
/// A pixel is filled when its center lies inside the polygon according to the
/// even-odd rule. The polygon is closed implicitly and may be concave.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `vertices` - The polygon vertices as (x, y) pixel coordinates.
/// * `color` - The fill color.
pub fn fill_polygon<const C: usize>(img: &mut Image<u8, C>, vertices: &[[i32; 2]], color: [u8; C]) {
    if vertices.len() < 3 {
        return;
    }

    let mut crossings = Vec::with_capacity(vertices.len());

    for y in 0..img.rows() {
        let yc = y as f64 + 0.5;

        crossings.clear();
        for (i, p0) in vertices.iter().enumerate() {
            let p1 = vertices[(i + 1) % vertices.len()];
            let (x0, y0) = (p0[0] as f64, p0[1] as f64);
            let (x1, y1) = (p1[0] as f64, p1[1] as f64);

            // half open rule so shared vertices are counted once
            if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
                crossings.push(x0 + (yc - y0) * (x1 - x0) / (y1 - y0));
            }
        }

        crossings.sort_by(f64::total_cmp);

        for span in crossings.chunks_exact(2) {
            // pixels whose center x + 0.5 falls in [span[0], span[1])
            let x_start = (span[0] - 0.5).ceil().max(0.0) as i64;
            let x_end = (span[1] - 0.5).ceil().min(img.cols() as f64) as i64;
            for x in x_start..x_end {
                set_pixel(img, x, y as i64, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanesight_image::{Image, ImageError, ImageSize};

    #[rustfmt::skip]
    #[test]
    fn test_draw_line() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 5 }, vec![0u8; 25],
        )?;
        draw_line(&mut img, (0, 0), (4, 4), [255], 1);
        assert_eq!(
            img.as_slice(),
            &[
                255,   0,   0,   0,   0,
                  0, 255,   0,   0,   0,
                  0,   0, 255,   0,   0,
                  0,   0,   0, 255,   0,
                  0,   0,   0,   0, 255,
            ]
        );
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_fill_polygon_rectangle() -> Result<(), ImageError> {
        let mut img = Image::new(
            ImageSize { width: 5, height: 4 }, vec![0u8; 20],
        )?;
        fill_polygon(&mut img, &[[1, 1], [4, 1], [4, 3], [1, 3]], [7]);
        assert_eq!(
            img.as_slice(),
            &[
                0, 0, 0, 0, 0,
                0, 7, 7, 7, 0,
                0, 7, 7, 7, 0,
                0, 0, 0, 0, 0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_fill_polygon_triangle() -> Result<(), ImageError> {
        let mut img = Image::from_size_val([10, 10].into(), 0u8)?;
        fill_polygon(&mut img, &[[0, 10], [5, 0], [10, 10]], [1]);

        // the apex row is narrow, the base row is full
        let row = |y: usize| &img.as_slice()[y * 10..(y + 1) * 10];
        assert_eq!(row(0).iter().filter(|&&v| v == 1).count(), 0);
        assert_eq!(row(9).iter().filter(|&&v| v == 1).count(), 10);
        assert!(row(5).iter().filter(|&&v| v == 1).count() > 4);
        assert_eq!(row(5)[0], 0);

        Ok(())
    }

    #[test]
    fn test_fill_polygon_degenerate() -> Result<(), ImageError> {
        let mut img = Image::from_size_val([4, 4].into(), 0u8)?;
        fill_polygon(&mut img, &[[0, 0], [3, 3]], [1]);
        assert!(img.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }
}
