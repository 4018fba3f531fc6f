pub mod error;
pub mod extract;
pub mod i18n;
pub mod metrics;
pub mod query_builder;
pub mod sorting;
