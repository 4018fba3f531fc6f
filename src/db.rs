pub mod report_sql;

pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod sell_in_repo;
pub use sell_in_repo::SellInRepository;
pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod growth_repo;
pub use growth_repo::GrowthRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
