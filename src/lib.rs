pub mod api;
pub mod document;
pub mod error;
pub mod formatting;
pub mod market_data;
pub mod models;
pub mod report;
pub mod universe;
