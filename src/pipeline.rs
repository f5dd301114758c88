use crate::compression::SwingingDoor;
use crate::config::RampConfig;
use crate::error::Result;
use crate::types::WindowedSeries;

/// Outcome of scoring a model series against a reference
#[derive(Debug, Clone)]
pub struct RampReport {
    pub name: String,
    pub score: f64,
    pub reference: WindowedSeries,
    pub competing: WindowedSeries,
}

/// Compresses both raw series with the same door and window, then scores
/// `model` against `reference`.
pub fn evaluate(reference: &[f64], model: &[f64], config: &RampConfig) -> Result<RampReport> {
    config.validate()?;
    let door = SwingingDoor::new(config.sensitivity_fraction())?;

    let reference = door.compress(reference, config.window_minutes)?;
    let competing = door.compress(model, config.window_minutes)?;
    let score = reference.ramp_score(&competing)?;

    log::debug!("{}: ramp score {}", config.name, score);

    Ok(RampReport {
        name: config.name.clone(),
        score,
        reference,
        competing,
    })
}
