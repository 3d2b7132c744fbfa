//! Energy & nuclear scenario evaluator
//!
//! Closed-form scenario metrics, energy-flow reconciliation, presets,
//! reference figures and a small survey store.

pub mod calculator;
pub mod chart;
pub mod db;
pub mod error;
pub mod models;
pub mod presets;
pub mod reference;
pub mod survey;

pub use calculator::{ModelConstants, ModelProfile, derive_energy_flow, evaluate};
pub use error::{ScenarioError, ScenarioResult};
pub use models::{EnergyMix, ScenarioInputs, ScenarioOutputs};
pub use presets::ScenarioPreset;
