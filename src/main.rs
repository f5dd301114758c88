use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use ramp_score::{RampConfig, RampReport, SwingingDoor, evaluate};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rampscore", about = "Swinging-door ramp score on a synthetic irradiance day")]
struct Cli {
    /// TOML file with sensitivity, window_minutes, name and plot
    #[arg(long)]
    config: Option<PathBuf>,

    /// Door sensitivity in percent
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Averaging window in minutes
    #[arg(long)]
    window: Option<usize>,

    /// Label of the competing series
    #[arg(long)]
    name: Option<String>,

    /// Print the windowed series as a table for plotting
    #[arg(long)]
    plot: Option<bool>,

    /// Length of the synthetic day in minutes
    #[arg(long, default_value_t = 1440)]
    minutes: usize,

    /// Lag of the synthetic forecast behind the observation, in minutes
    #[arg(long, default_value_t = 15)]
    lag: usize,

    /// Write the compressed observation archive to this file
    #[arg(long)]
    archive: Option<PathBuf>,
}

impl Cli {
    fn ramp_config(&self) -> anyhow::Result<RampConfig> {
        let mut config = match &self.config {
            Some(path) => RampConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RampConfig::default(),
        };
        if let Some(sensitivity) = self.sensitivity {
            config.sensitivity = sensitivity;
        }
        if let Some(window) = self.window {
            config.window_minutes = window;
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(plot) = self.plot {
            config.plot = plot;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Clear-sky bell between 06:00 and 18:00 in watts per square metre.
fn clear_sky(minute: usize) -> f64 {
    let phase = (minute as f64 - 360.0) / 720.0;
    if (0.0..=1.0).contains(&phase) {
        1000.0 * (std::f64::consts::PI * phase).sin()
    } else {
        0.0
    }
}

/// Passing clouds cut irradiance in sharp, irregular steps.
fn cloud_cover(minute: usize) -> f64 {
    let m = minute as f64;
    let shade = (m / 37.0).sin() * (m / 11.0).cos();
    if shade > 0.55 { 0.35 } else { 1.0 }
}

fn synthetic_day(minutes: usize, lag: usize) -> (Vec<f64>, Vec<f64>) {
    let observed = (0..minutes)
        .map(|m| clear_sky(m) * cloud_cover(m))
        .collect();
    let forecast = (0..minutes)
        .map(|m| {
            let m = m.saturating_sub(lag);
            clear_sky(m) * (0.5 + 0.5 * cloud_cover(m))
        })
        .collect();
    (observed, forecast)
}

fn print_table(report: &RampReport) {
    println!("minute\tobserved\t{}", report.name);
    for ((t, r), c) in report
        .reference
        .times
        .iter()
        .zip(&report.reference.values)
        .zip(&report.competing.values)
    {
        println!("{}\t{:.3}\t{:.3}", t, r, c);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.ramp_config()?;

    println!("Swinging Door Ramp Score");
    println!("========================\n");

    let (observed, forecast) = synthetic_day(cli.minutes, cli.lag);
    info!(minutes = cli.minutes, lag = cli.lag, "generated synthetic day");

    let door = SwingingDoor::new(config.sensitivity_fraction())?;
    let start = std::time::Instant::now();
    let compressed = door.archive(&observed)?;
    let compress_time = start.elapsed();

    let stats = compressed.stats();
    println!("Observed series:");
    println!("  Samples: {}", stats.raw_len);
    println!("  Archived points: {}", stats.archived_len);
    println!("  Compression ratio: {:.2}%", stats.ratio * 100.0);
    println!("  Compression time: {:?}", compress_time);
    println!("  Fingerprint: {}\n", compressed.fingerprint()?);

    if let Some(path) = &cli.archive {
        compressed
            .write_to_file(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "archive written");
    }

    let report = evaluate(&observed, &forecast, &config)?;
    println!("Ramp score ({}):", report.name);
    println!("  Sensitivity: {}%", config.sensitivity);
    println!("  Window: {} minutes", config.window_minutes);
    println!("  Windows scored: {}", report.reference.windows());
    println!("  Score: {:.4}\n", report.score);

    if config.plot {
        print_table(&report);
    }

    Ok(())
}
