pub mod api;
pub mod document;
pub mod error;
pub mod parser;
pub mod records;
pub mod scanner;

pub use api::parse;
