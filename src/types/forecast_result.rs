use crate::types::forecast_sample::ForecastSample;
use serde::{Deserialize, Serialize};

/// An ordered hourly series plus its provenance.
///
/// `mock` is `true` whenever the series was synthesised instead of fetched;
/// `limit_reached` is additionally set when the synthetic series was forced
/// by the daily quota. It is omitted from JSON when `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub data: Vec<ForecastSample>,
    pub mock: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub limit_reached: bool,
}

impl ForecastResult {
    pub fn real(data: Vec<ForecastSample>) -> Self {
        Self {
            data,
            mock: false,
            limit_reached: false,
        }
    }

    pub fn synthetic(data: Vec<ForecastSample>) -> Self {
        Self {
            data,
            mock: true,
            limit_reached: false,
        }
    }

    /// Marks a synthetic result as produced because the daily quota ran out.
    pub fn with_limit_reached(mut self) -> Self {
        self.limit_reached = true;
        self
    }

    /// `true` when the series is non-empty and strictly increasing in time.
    pub fn is_well_formed(&self) -> bool {
        !self.data.is_empty() && self.data.windows(2).all(|w| w[0].time < w[1].time)
    }
}
