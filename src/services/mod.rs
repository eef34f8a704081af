pub mod converter;
pub mod error;
pub mod reader;
pub mod writer;
