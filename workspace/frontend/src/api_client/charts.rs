use common::{ChartDto, ChartKind, Pollutant};

use crate::api_client::{self, encode};

/// Fetches the series of one chart. `compare_with` only matters for scatter plots.
pub async fn get_chart(
    site_name: &str,
    parameter: Pollutant,
    kind: ChartKind,
    compare_with: Option<Pollutant>,
) -> Result<ChartDto, String> {
    log::trace!("Fetching {} of {} for {}", kind, parameter, site_name);
    let mut url = format!(
        "/charts?site_name={}&parameter={}&chart={}",
        encode(site_name),
        parameter,
        kind.slug()
    );
    if let Some(other) = compare_with {
        url.push_str(&format!("&compare_with={}", other));
    }

    let result = api_client::get::<ChartDto>(&url).await;

    if let Err(ref e) = result {
        log::error!("Failed to fetch chart: {}", e);
    }

    result
}
