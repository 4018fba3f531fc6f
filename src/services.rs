pub mod catalog_service;
pub mod forecast_service;
pub mod growth_service;
pub mod sales_service;
pub mod sell_in_service;
pub mod stock_service;
pub mod trend_service;

pub use catalog_service::CatalogService;
pub use forecast_service::ForecastService;
pub use growth_service::GrowthService;
pub use sales_service::SalesService;
pub use sell_in_service::SellInService;
pub use stock_service::StockService;
pub use trend_service::TrendService;
