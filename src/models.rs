pub mod catalog;
pub mod dimension;
pub mod filters;
pub mod growth;
pub mod sales;
pub mod sell_in;
pub mod stock;
pub mod trend;
