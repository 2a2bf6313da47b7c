use crate::handlers::{
    charts::get_chart,
    health::health_check,
    predictions::create_prediction,
    sites::{lookup_site, search_sites},
    statistics::get_statistics,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // Sites
        .route("/api/v1/sites", get(search_sites))
        .route("/api/v1/sites/lookup", get(lookup_site))
        // Predictions
        .route("/api/v1/predictions", post(create_prediction))
        // Observation analytics
        .route("/api/v1/statistics", get(get_statistics))
        .route("/api/v1/charts", get(get_chart))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // The Prometheus recorder is process-global and can only be installed once,
    // so test builds that create many routers leave it out.
    #[cfg(not(test))]
    let router = {
        let (prometheus_layer, metric_handle) = axum_prometheus::PrometheusMetricLayer::pair();
        router
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer)
    };

    router
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
