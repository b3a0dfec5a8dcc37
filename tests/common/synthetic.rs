use depth_completion::calib::{BeamTable, CalibrationParams, LAYER_COUNT};
use depth_completion::image::GuideImage;
use depth_completion::types::RawPoint;

/// Sensor-frame point for a camera-convention vector (x right, y down,
/// z forward).
pub fn raw_from_camera(x: f64, y: f64, z: f64) -> RawPoint {
    RawPoint::new(-z, x, -y)
}

/// Scan of a fronto-parallel wall at camera depth `depth`: every beam layer
/// sweeps left to right with `samples` points covering 90% of the image
/// width.
pub fn wall_scan(params: &CalibrationParams, depth: f64, samples: usize) -> Vec<RawPoint> {
    assert!(samples >= 2, "need at least two samples per layer");
    let beams = BeamTable::new();
    let half_span = 0.9 * (params.width / 2) as f64 / params.focal;
    let mut points = Vec::with_capacity(LAYER_COUNT * samples);
    for layer in 0..LAYER_COUNT {
        // just below the beam tangent so the lower bound lands on `layer`
        let tan = beams.tan(layer) - 1e-9;
        for k in 0..samples {
            let s = -half_span + 2.0 * half_span * k as f64 / (samples - 1) as f64;
            let x = s * depth;
            let y = tan * (x * x + depth * depth).sqrt();
            points.push(raw_from_camera(x, y, depth));
        }
    }
    points
}

/// Uniform mid-grey guide of the calibrated size.
pub fn flat_guide(params: &CalibrationParams) -> GuideImage {
    GuideImage::solid(params.width, params.height, [128, 128, 128])
}

/// Guide split into a dark left and a bright right half.
pub fn split_guide(params: &CalibrationParams) -> GuideImage {
    let mut guide = flat_guide(params);
    for y in 0..params.height {
        for x in params.width / 2..params.width {
            guide.set(x, y, [240, 240, 240]);
        }
    }
    guide
}

pub fn small_params() -> CalibrationParams {
    CalibrationParams {
        width: 64,
        height: 48,
        focal: 32.0,
        ..Default::default()
    }
}

/// Tall image where neighbouring beams land on distinct rows.
pub fn tall_params() -> CalibrationParams {
    CalibrationParams {
        width: 64,
        height: 480,
        focal: 320.0,
        ..Default::default()
    }
}
