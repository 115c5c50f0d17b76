use crate::types::forecast_result::ForecastResult;
use serde::Serialize;
use std::sync::Arc;

/// The JSON body returned for a spot forecast request.
///
/// Serialises as `{ "spot_name": ..., "data": [...], "mock": bool, "limitReached"?: true }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResponse {
    pub spot_name: String,
    #[serde(flatten)]
    pub forecast: Arc<ForecastResult>,
}
