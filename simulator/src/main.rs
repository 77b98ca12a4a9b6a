use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline FMCW radar processing driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 64)]
    samples_per_chirp: usize,
    #[arg(long, default_value_t = 32)]
    chirps_per_frame: usize,
    #[arg(long, default_value_t = 4)]
    frames: usize,
    /// Write the detections as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.samples_per_chirp, args.chirps_per_frame, args.frames)
    };

    let runner = Runner::new(workflow_config);
    let result = runner.execute()?;

    println!(
        "Processed {} frames -> detections {}, plan rebuilds range {} doppler {}",
        result.frames,
        result.detections.len(),
        result.range_plan_rebuilds,
        result.doppler_plan_rebuilds
    );
    for detection in &result.detections {
        println!(
            "frame {:>3} range {:>6.2} m velocity {:>6.2} m/s magnitude {:>8.1} monopulse {:>6} dbf {:>6}",
            detection.frame_index,
            detection.range_m,
            detection.velocity_m_s,
            detection.magnitude,
            format_angle(detection.monopulse_angle_rad),
            format_angle(detection.beamformed_angle_rad),
        );
    }

    if let Some(report_path) = args.report {
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let report = serde_json::to_string_pretty(&result).context("serializing report")?;
        fs::write(&report_path, report)
            .with_context(|| format!("writing report {}", report_path.display()))?;
    }

    Ok(())
}

fn format_angle(angle: Option<f32>) -> String {
    angle
        .map(|rad| format!("{:.1}°", rad.to_degrees()))
        .unwrap_or_else(|| "-".to_string())
}
