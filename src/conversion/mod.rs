//! Length conversion module
//!
//! The conversion engine and the fixed table of length units it works with.

pub mod converter;
pub mod engine;
pub mod units;

pub use converter::{convert_length, convert_text, format_result, parse_input_value, round_to_hundredths};
pub use engine::{convert, ConversionEngine, ConversionSnapshot, ConversionState};
pub use units::{available_units, ConversionError, LengthUnit};
