mod data_api;
mod trade_api;

pub use data_api::DataApi;
pub use trade_api::TradeApi;
