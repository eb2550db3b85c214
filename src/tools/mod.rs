//! ULC Tools module
//!
//! MCP tool implementations for the Unit Length Converter.

pub mod converter;
pub mod status;
