//! Unit Length Converter (ULC) Library
//!
//! Live length conversion engine and its MCP presentation layer.

pub mod build_info;
pub mod config;
pub mod conversion;
pub mod mcp;
pub mod session;
pub mod tools;
