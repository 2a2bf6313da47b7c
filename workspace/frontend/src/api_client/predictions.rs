use common::{PredictionDto, PredictionRequest};

use crate::api_client;

pub async fn create_prediction(request: PredictionRequest) -> Result<PredictionDto, String> {
    log::trace!("Requesting prediction for {} in {}", request.site_name, request.year);
    let result = api_client::post::<PredictionDto, _>("/predictions", &request).await;

    match &result {
        Ok(prediction) => log::info!(
            "Predicted {} values for {} ({})",
            prediction.values.len(),
            prediction.site_name,
            prediction.year
        ),
        Err(e) => log::error!("Prediction failed: {}", e),
    }

    result
}
