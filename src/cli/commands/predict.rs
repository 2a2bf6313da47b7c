use anyhow::{anyhow, Result};
use compute::ComputeError;

use crate::config::Settings;
use crate::helpers::errors::MISSING_SITE_MESSAGE;

/// Prints the predicted pollutant levels for a site and year.
pub fn predict(settings: &Settings, site: &str, year: i32) -> Result<()> {
    let ctx = settings.load_context()?;

    let prediction = match ctx.predict(site, year) {
        Ok(prediction) => prediction,
        Err(ComputeError::MissingSite(_)) => return Err(anyhow!(MISSING_SITE_MESSAGE)),
        Err(e) => return Err(e.into()),
    };

    println!(
        "Predicted pollutant levels for {} (id {}) in {}:",
        prediction.site_name, prediction.site_id, prediction.year
    );
    for (pollutant, value) in &prediction.values {
        println!("  {:<4} {:>10.3}", pollutant.column(), value);
    }
    for warning in &prediction.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}
