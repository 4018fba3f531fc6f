pub mod catalog;
pub mod forecast;
pub mod growth;
pub mod sales;
pub mod sell_in;
pub mod stock;

use chrono::NaiveDate;

/// Data de referência das janelas relativas ("hoje", fuso do servidor).
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
