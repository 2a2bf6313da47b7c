use crate::helpers::converters::site_to_dto;
use crate::helpers::errors::compute_error_response;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, SiteLookupQuery, SiteSearchQuery};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::SiteDto;
use tracing::{debug, info, instrument, trace};

/// Search site names
#[utoipa::path(
    get,
    path = "/api/v1/sites",
    tag = "sites",
    params(SiteSearchQuery),
    responses(
        (status = 200, description = "Matching site names retrieved successfully", body = ApiResponse<Vec<String>>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn search_sites(
    Valid(Query(query)): Valid<Query<SiteSearchQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<String>>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering search_sites function");

    let text = query.search.unwrap_or_default();
    let names = state.ctx.search(&text);
    debug!("Search '{}' matched {} sites", text, names.len());

    let message = if names.is_empty() {
        "No sites match the search".to_string()
    } else {
        "Sites retrieved successfully".to_string()
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: names,
            message,
            success: true,
        }),
    ))
}

/// Look up a site's identifier by its display name
#[utoipa::path(
    get,
    path = "/api/v1/sites/lookup",
    tag = "sites",
    params(SiteLookupQuery),
    responses(
        (status = 200, description = "Site retrieved successfully", body = ApiResponse<SiteDto>),
        (status = 404, description = "Site not found", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn lookup_site(
    Valid(Query(query)): Valid<Query<SiteLookupQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<SiteDto>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering lookup_site function");

    let site = state.ctx.site(&query.name).map_err(compute_error_response)?;
    info!("Resolved site '{}' to id {}", site.name, site.id);

    Ok((
        StatusCode::OK,
        Json(ApiResponse {
            data: site_to_dto(site),
            message: "Site retrieved successfully".to_string(),
            success: true,
        }),
    ))
}
