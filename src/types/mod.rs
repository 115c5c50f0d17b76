pub mod forecast_result;
pub mod forecast_sample;
pub mod lat_lon;
pub mod response;
