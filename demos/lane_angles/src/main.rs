use argh::FromArgs;
use std::path::PathBuf;

use lanesight::detect::{
    classifier::{LaneSelection, LaneSide},
    kitti,
    observer::{LoggingObserver, PipelineObserver},
    projector::RoadPoint,
    segment::LineSegment,
    DetectorConfig, LaneDetector,
};
use lanesight::image::{Image, ImageSize};
use lanesight::imgproc::draw::draw_line;

#[derive(FromArgs)]
/// Estimate the road-plane angles of the lane boundaries in a KITTI road frame
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path to the KITTI calibration file of the frame
    #[argh(option, short = 'c')]
    calib_path: PathBuf,

    /// path to a JSON detector configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// index of the camera that took the image
    #[argh(option, default = "2")]
    camera: usize,

    /// path to save the image with the selected segments drawn
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

/// Logs every stage and keeps the selected segments for the overlay.
#[derive(Default)]
struct OverlayObserver {
    logger: LoggingObserver,
    selection: LaneSelection,
}

impl PipelineObserver for OverlayObserver {
    fn on_edges(&mut self, edges: &Image<u8, 1>) {
        self.logger.on_edges(edges);
    }

    fn on_roi_mask(&mut self, mask: &Image<u8, 1>) {
        self.logger.on_roi_mask(mask);
    }

    fn on_masked_edges(&mut self, edges: &Image<u8, 1>) {
        self.logger.on_masked_edges(edges);
    }

    fn on_segments(&mut self, segments: &[LineSegment]) {
        self.logger.on_segments(segments);
    }

    fn on_selection(&mut self, selection: &LaneSelection) {
        self.logger.on_selection(selection);
        self.selection = *selection;
    }

    fn on_projected(&mut self, side: LaneSide, start: &RoadPoint, end: &RoadPoint) {
        self.logger.on_projected(side, start, end);
    }
}

fn draw_segment(image: &mut Image<u8, 3>, segment: &LineSegment, color: [u8; 3]) {
    let p0 = (segment.x1.round() as i64, segment.y1.round() as i64);
    let p1 = (segment.x2.round() as i64, segment.y2.round() as i64);
    draw_line(image, p0, p1, color, 3);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // read the image
    let rgb8 = image::open(&args.image_path)?.to_rgb8();
    let size = ImageSize {
        width: rgb8.width() as usize,
        height: rgb8.height() as usize,
    };
    let mut frame = Image::<u8, 3>::new(size, rgb8.into_raw())?;

    // read the calibration and the optional configuration
    let calib = kitti::read_kitti_calibration(&args.calib_path)?;
    let config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };

    let detector = LaneDetector::new(
        &calib.intrinsics(args.camera)?,
        &calib.camera_to_road()?,
        config,
    )?;
    log::info!(
        "camera {} is {:.3} above the road",
        args.camera,
        detector.projector().camera_height()
    );

    let mut observer = OverlayObserver::default();
    let output = detector.run_observed(&frame, &mut observer)?;

    match output.left() {
        Some(angle) => println!("left lane: {angle:.4} rad ({:.2} deg)", angle.to_degrees()),
        None => println!("left lane: not found"),
    }
    match output.right() {
        Some(angle) => println!("right lane: {angle:.4} rad ({:.2} deg)", angle.to_degrees()),
        None => println!("right lane: not found"),
    }

    if let Some(path) = args.output {
        if let Some(segment) = &observer.selection.left {
            draw_segment(&mut frame, segment, [255, 0, 0]);
        }
        if let Some(segment) = &observer.selection.right {
            draw_segment(&mut frame, segment, [0, 0, 255]);
        }

        let overlay = image::RgbImage::from_raw(
            size.width as u32,
            size.height as u32,
            frame.into_vec(),
        )
        .ok_or("failed to build the overlay image")?;
        overlay.save(&path)?;
        log::info!("overlay saved to {}", path.display());
    }

    Ok(())
}
