use anyhow::Result;
use tracing::debug;

use crate::config::Settings;

/// Prints the site names matching `search`, one per line.
pub fn list_sites(settings: &Settings, search: &str) -> Result<()> {
    let ctx = settings.load_context()?;
    let names = ctx.search(search);
    debug!("{} sites match '{}'", names.len(), search);

    if names.is_empty() {
        println!("No sites match '{}'", search);
        return Ok(());
    }
    for name in names {
        let site = ctx.site(&name)?;
        println!("{}\t{}\t{} observations", site.id, site.name, site.observations);
    }
    Ok(())
}
