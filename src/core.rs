pub mod cache;
pub mod inverter;
pub mod password;
pub mod scraper;
