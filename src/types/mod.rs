pub mod forecast_request;
pub mod forecast_response;
pub mod hourly_block;
pub mod hourly_variable;
