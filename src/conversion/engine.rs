//! Conversion engine
//!
//! Holds the state behind one converter screen and re-derives the displayed
//! result synchronously after every mutation.

use serde::Serialize;

use super::converter::convert_text;
use super::units::{available_units, ConversionError, LengthUnit};

/// Mutable state of one converter
///
/// Only the engine mutates this; callers get shared references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionState {
    pub input_text: String,
    pub input_unit: LengthUnit,
    pub output_unit: LengthUnit,
    pub result: String,
}

impl Default for ConversionState {
    fn default() -> Self {
        Self {
            input_text: String::new(),
            input_unit: LengthUnit::M,
            output_unit: LengthUnit::M,
            result: String::new(),
        }
    }
}

/// Point-in-time view of an engine, for pollers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionSnapshot {
    pub input_text: String,
    pub input_unit: LengthUnit,
    pub input_factor: f64,
    pub output_unit: LengthUnit,
    pub output_factor: f64,
    pub result: String,
    /// Bumped on every successful mutation
    pub revision: u64,
}

/// Which of the two selectors a unit change targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Input,
    Output,
}

#[derive(Debug, Clone, Default)]
pub struct ConversionEngine {
    state: ConversionState,
    revision: u64,
}

impl ConversionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the raw text verbatim and recompute
    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.state.input_text = text.into();
        self.recompute();
    }

    /// Select the input unit by identifier
    ///
    /// Unknown identifiers leave the state untouched.
    pub fn set_input_unit(&mut self, unit_id: &str) -> Result<(), ConversionError> {
        self.set_unit(Side::Input, unit_id)
    }

    /// Select the output unit by identifier
    ///
    /// Unknown identifiers leave the state untouched.
    pub fn set_output_unit(&mut self, unit_id: &str) -> Result<(), ConversionError> {
        self.set_unit(Side::Output, unit_id)
    }

    pub fn select_input_unit(&mut self, unit: LengthUnit) {
        self.state.input_unit = unit;
        self.recompute();
    }

    pub fn select_output_unit(&mut self, unit: LengthUnit) {
        self.state.output_unit = unit;
        self.recompute();
    }

    fn set_unit(&mut self, side: Side, unit_id: &str) -> Result<(), ConversionError> {
        let unit = unit_id.parse::<LengthUnit>().map_err(|e| {
            tracing::warn!("Rejected {:?} unit selection '{}'", side, unit_id);
            e
        })?;
        match side {
            Side::Input => self.select_input_unit(unit),
            Side::Output => self.select_output_unit(unit),
        }
        Ok(())
    }

    fn recompute(&mut self) {
        let state = &mut self.state;
        state.result = convert_text(&state.input_text, state.input_unit, state.output_unit);
        self.revision += 1;
        tracing::debug!(
            "Recomputed '{}' {} -> {} = {} (rev {})",
            state.input_text,
            state.input_unit,
            state.output_unit,
            state.result,
            self.revision
        );
    }

    pub fn result(&self) -> &str {
        &self.state.result
    }

    pub fn input_text(&self) -> &str {
        &self.state.input_text
    }

    pub fn input_unit(&self) -> LengthUnit {
        self.state.input_unit
    }

    pub fn output_unit(&self) -> LengthUnit {
        self.state.output_unit
    }

    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn available_units(&self) -> &'static [LengthUnit] {
        available_units()
    }

    pub fn snapshot(&self) -> ConversionSnapshot {
        ConversionSnapshot {
            input_text: self.state.input_text.clone(),
            input_unit: self.state.input_unit,
            input_factor: self.state.input_unit.factor(),
            output_unit: self.state.output_unit,
            output_factor: self.state.output_unit.factor(),
            result: self.state.result.clone(),
            revision: self.revision,
        }
    }
}

/// One-shot conversion on a fresh engine
pub fn convert(value_text: &str, from: &str, to: &str) -> Result<ConversionSnapshot, ConversionError> {
    let mut engine = ConversionEngine::new();
    engine.set_input_unit(from)?;
    engine.set_output_unit(to)?;
    engine.set_input_text(value_text);
    Ok(engine.snapshot())
}
