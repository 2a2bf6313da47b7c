use common::SiteDto;

use crate::api_client::{self, encode};

/// Site names containing `search`, case-insensitively; an empty search lists all.
pub async fn search_sites(search: &str) -> Result<Vec<String>, String> {
    log::trace!("Searching sites for '{}'", search);
    let result = api_client::get::<Vec<String>>(&format!("/sites?search={}", encode(search))).await;

    if let Ok(ref names) = result {
        log::debug!("{} sites match '{}'", names.len(), search);
    }

    result
}

pub async fn lookup_site(name: &str) -> Result<SiteDto, String> {
    log::trace!("Looking up site '{}'", name);
    api_client::get::<SiteDto>(&format!("/sites/lookup?name={}", encode(name))).await
}
