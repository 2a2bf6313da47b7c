use common::{ParameterStatistics, Pollutant};

use crate::api_client::{self, encode};

pub async fn get_statistics(site_name: &str, parameter: Pollutant) -> Result<ParameterStatistics, String> {
    log::trace!("Fetching {} statistics for {}", parameter, site_name);
    let url = format!("/statistics?site_name={}&parameter={}", encode(site_name), parameter);
    let result = api_client::get::<ParameterStatistics>(&url).await;

    if let Err(ref e) = result {
        log::error!("Failed to fetch statistics: {}", e);
    }

    result
}
