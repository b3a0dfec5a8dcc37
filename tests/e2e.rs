mod common;

use common::synthetic::{
    flat_guide, raw_from_camera, small_params, split_guide, tall_params, wall_scan,
};
use depth_completion::calib::CalibrationProjector;
use depth_completion::evaluate::{evaluate_report, ReportWriter};
use depth_completion::image::is_valid_depth;
use depth_completion::occlusion::{is_dominated, LayerOcclusionFilter};
use depth_completion::strategy::{gather, scatter};
use depth_completion::{CompletionParams, DepthCompleter, Method};

const WALL: f64 = 8.0;

fn params_for(method: Method) -> CompletionParams {
    CompletionParams {
        calibration: small_params(),
        ..Default::default()
    }
    .with_method(method)
}

#[test]
fn flat_wall_is_reconstructed_by_every_method() {
    common::init_logging();
    let calib = small_params();
    let points = wall_scan(&calib, WALL, 90);
    let guide = flat_guide(&calib);

    for method in Method::ALL {
        let completer = DepthCompleter::new(params_for(method)).unwrap();
        let report = completer.process(&points, Some(&guide)).unwrap();
        assert_eq!(report.method, method);
        assert_eq!((report.dense.w, report.dense.h), (64, 64));
        assert_eq!(report.frame.sparse.h, 16);

        let scores = evaluate_report(&report);
        assert!(scores.mse < 1e-12, "{method}: mse={}", scores.mse);
        assert!(scores.mre < 1e-12, "{method}: mre={}", scores.mre);
        assert!(scores.ssim > 0.999, "{method}: ssim={}", scores.ssim);
        assert!((scores.coverage - 1.0).abs() < 1e-12, "{method}: coverage={}", scores.coverage);
    }
}

#[test]
fn guided_methods_accept_an_edge_in_the_guide() {
    common::init_logging();
    let calib = small_params();
    let points = wall_scan(&calib, WALL, 90);
    let guide = split_guide(&calib);
    for method in [Method::Pwas, Method::Mrf] {
        let completer = DepthCompleter::new(params_for(method)).unwrap();
        let report = completer.process(&points, Some(&guide)).unwrap();
        assert!(report
            .dense
            .data
            .iter()
            .filter(|&&z| is_valid_depth(z))
            .all(|&z| (z - WALL).abs() < 1e-9));
    }
}

#[test]
fn full_height_mode_fills_every_image_row() {
    let mut params = params_for(Method::Linear);
    params.calibration.is_full_height = true;
    let completer = DepthCompleter::new(params).unwrap();
    let points = wall_scan(&small_params(), WALL, 90);
    let report = completer.process(&points, None).unwrap();

    assert_eq!((report.dense.w, report.dense.h), (64, 48));
    assert_eq!(report.rows.comparison_rows.h, 64);
    let scores = evaluate_report(&report);
    assert!(scores.mre < 1e-12);
    assert!(scores.coverage > 0.99);
}

#[test]
fn reference_round_trips_through_its_row_grid() {
    let calib = tall_params();
    let completer = DepthCompleter::new(CompletionParams {
        calibration: calib.clone(),
        ..Default::default()
    })
    .unwrap();
    let report = completer.process(&wall_scan(&calib, WALL, 40), None).unwrap();
    let frame = &report.frame;
    assert!(frame.reference.valid_count() > 64 * 30);

    let image = scatter(&frame.reference, &frame.reference_rows, calib.height);
    assert_eq!(image.valid_count(), frame.reference.valid_count());
    let back = gather(&image, &frame.reference_rows);
    for (i, &z) in frame.reference.data.iter().enumerate() {
        if is_valid_depth(z) {
            assert_eq!(back.data[i], z);
        }
    }
}

#[test]
fn identity_calibration_places_a_point_by_pinhole_projection() {
    let calib = small_params();
    let completer = DepthCompleter::new(CompletionParams {
        calibration: calib.clone(),
        ..Default::default()
    })
    .unwrap();
    // camera (2, 0.5, 8) → u = 32 + 32·2/8 = 40
    let report = completer.process(&[raw_from_camera(2.0, 0.5, 8.0)], None).unwrap();
    let reference = &report.frame.reference;
    assert_eq!(reference.valid_count(), 1);
    let layer = (0..64).find(|&l| reference.is_valid(40, l)).unwrap();
    assert_eq!(reference.get(40, layer), 8.0);
    assert_eq!(report.frame.reference_rows.get(40, layer), (24.0f64 + 32.0 * 0.5 / 8.0) as usize);
}

#[test]
fn occluded_points_do_not_survive() {
    let calib = small_params();
    let mut points = wall_scan(&calib, WALL, 60);
    // a post in front of the wall, scanned after the wall in every layer
    let projector = CalibrationProjector::new(&calib);
    let beams = projector.beams().clone();
    for layer in 0..64 {
        let tan = beams.tan(layer) - 1e-9;
        for k in 0..5 {
            let x = -0.5 + 0.1 * k as f64;
            let z = 2.0;
            points.push(raw_from_camera(x, tan * (x * x + z * z).sqrt(), z));
        }
    }
    let layers = LayerOcclusionFilter::new().filter(&projector.project(&points));
    for layer in &layers {
        for (i, kept) in layer.iter().enumerate() {
            for later in &layer[i + 1..] {
                assert!(!is_dominated(kept, later));
            }
        }
    }
}

#[test]
fn frames_are_reported_as_csv_rows() {
    let calib = small_params();
    let completer = DepthCompleter::new(params_for(Method::Original)).unwrap();
    let mut writer = ReportWriter::new(Vec::new());
    writer.write_header().unwrap();
    for frame in [1100u32, 1101] {
        let report = completer
            .process(&wall_scan(&calib, WALL + frame as f64 - 1100.0, 30), None)
            .unwrap();
        writer
            .write_row(frame, report.timing.total_ms, &evaluate_report(&report))
            .unwrap();
    }
    let csv = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1100,"));
    assert!(lines[2].starts_with("1101,"));
}
