use anyhow::Result;
use common::Pollutant;

use crate::config::Settings;
use crate::helpers::converters::statistics_to_dto;

fn show(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Prints descriptive statistics of one pollutant at one site.
pub fn describe(settings: &Settings, site: &str, parameter: Pollutant) -> Result<()> {
    let ctx = settings.load_context()?;
    let stats = statistics_to_dto(site, parameter, ctx.statistics(site, parameter)?);

    println!("{} at {}", stats.parameter, stats.site_name);
    println!("  count   {}", stats.count);
    println!("  mean    {}", show(stats.mean));
    println!("  median  {}", show(stats.median));
    println!("  std     {}", show(stats.std_dev));
    println!("  min     {}", show(stats.min));
    println!("  max     {}", show(stats.max));
    Ok(())
}
