use depth_completion::config::load_config;
use depth_completion::frames::{load_frame, FrameInputs};
use depth_completion::strategy::PwasOptions;
use depth_completion::{evaluate_report, DepthCompleter, Method};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::env;
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
    let program = args.next().unwrap_or_else(|| "pwas_tune".to_string());
    let config_path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = load_config(Path::new(&config_path))?;

    let base = config.params.clone().with_method(Method::Pwas);
    DepthCompleter::new(base.clone()).map_err(|e| e.to_string())?;

    let is_rgb = base.calibration.is_rgb;
    let frames: Vec<FrameInputs> = config
        .frames
        .iter()
        .filter_map(|&frame| match load_frame(&config.data_dir, frame, is_rgb) {
            Ok(inputs) => Some(inputs),
            Err(err) => {
                warn!("frame {frame} skipped: {err}");
                None
            }
        })
        .collect();
    if frames.is_empty() {
        return Err("No readable frames to tune on".to_string());
    }

    let combos = config.tune.combinations();
    info!(
        "pwas_tune frames={} combinations={}",
        frames.len(),
        combos.len()
    );
    let start = Instant::now();
    let scored: Vec<(PwasOptions, f64)> = combos
        .into_par_iter()
        .filter_map(|options| {
            let mut params = base.clone();
            params.strategy.pwas = options.clone();
            let completer = DepthCompleter::new(params).ok()?;
            let mut total = 0.0;
            for inputs in &frames {
                match completer.process(&inputs.points, Some(&inputs.guide)) {
                    Ok(report) => total += evaluate_report(&report).mre,
                    Err(err) => {
                        warn!("frame {} failed for {:?}: {err}", inputs.frame, options);
                        return None;
                    }
                }
            }
            let mean = total / frames.len() as f64;
            debug!("pwas_tune {:?} mean_mre={mean:.6}", options);
            Some((options, mean))
        })
        .collect();

    let (best, error) = scored
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .ok_or_else(|| "No parameter combination could be evaluated".to_string())?;
    println!(
        "Evaluated {} combinations in {:.1} s",
        scored.len(),
        start.elapsed().as_secs_f64()
    );
    println!("sigma_c = {}", best.sigma_c);
    println!("sigma_s = {}", best.sigma_s);
    println!("sigma_r = {}", best.sigma_r);
    println!("r = {}", best.r);
    println!("mean relative error = {error:.6}");
    Ok(())
}
