use depth_completion::config::{load_config, RuntimeConfig};
use depth_completion::evaluate::{evaluate_report, reproject, FrameScores, ReportWriter};
use depth_completion::frames::load_frame;
use depth_completion::image::io::{save_depth_png, write_json_file};
use depth_completion::image::is_valid_depth;
use depth_completion::{CompletionReport, DepthCompleter};
use log::{info, warn};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "depth_complete".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = load_config(Path::new(&config_path))?;

    let completer = DepthCompleter::new(config.params.clone()).map_err(|e| e.to_string())?;
    let file = File::create(&config.report_out)
        .map_err(|e| format!("Failed to create {}: {e}", config.report_out.display()))?;
    let mut report = ReportWriter::new(BufWriter::new(file));
    report
        .write_header()
        .map_err(|e| format!("Failed to write report header: {e}"))?;

    for &frame in &config.frames {
        match run_frame(&completer, &config, frame) {
            Ok((elapsed_ms, scores)) => {
                report
                    .write_row(frame, elapsed_ms, &scores)
                    .map_err(|e| format!("Failed to write report row: {e}"))?;
                info!(
                    "frame {frame}: {elapsed_ms:.1} ms ssim={:.4} mse={:.4} mre={:.4} coverage={:.3}",
                    scores.ssim, scores.mse, scores.mre, scores.coverage
                );
            }
            Err(err) => warn!("frame {frame} skipped: {err}"),
        }
    }

    let written = report.rows_written();
    report
        .into_inner()
        .map_err(|e| format!("Failed to flush report: {e}"))?;
    println!(
        "{written}/{} frames written to {}",
        config.frames.len(),
        config.report_out.display()
    );
    Ok(())
}

fn run_frame(
    completer: &DepthCompleter,
    config: &RuntimeConfig,
    frame: u32,
) -> Result<(f64, FrameScores), String> {
    let is_rgb = completer.params().calibration.is_rgb;
    let inputs = load_frame(&config.data_dir, frame, is_rgb)?;

    let start = Instant::now();
    let result = completer
        .process(&inputs.points, Some(&inputs.guide))
        .map_err(|e| e.to_string())?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let scores = evaluate_report(&result);
    if let Some(dir) = &config.debug_dir {
        save_debug_artifacts(dir, frame, &result)?;
    }
    Ok((elapsed_ms, scores))
}

fn save_debug_artifacts(dir: &Path, frame: u32, result: &CompletionReport) -> Result<(), String> {
    let max_depth = result
        .frame
        .reference
        .data
        .iter()
        .copied()
        .filter(|&z| is_valid_depth(z))
        .fold(0.0f64, f64::max);
    let method = result.method;
    save_depth_png(
        &result.frame.reference,
        max_depth,
        &dir.join(format!("{frame}_reference.png")),
    )?;
    save_depth_png(
        &result.dense,
        max_depth,
        &dir.join(format!("{frame}_{method}.png")),
    )?;
    save_depth_png(
        &reproject(result),
        max_depth,
        &dir.join(format!("{frame}_{method}_compared.png")),
    )?;
    write_json_file(&dir.join(format!("{frame}_timing.json")), &result.timing)
}
