//! Core domain model for the Strama console engine
//!
//! This crate holds the pure, runtime-free pieces of the console:
//! instance records and their status lifecycle, the composable filter
//! state used by list views, and validated form fields for the
//! create dialogs. Everything here is plain data plus policy — no I/O.

pub mod filter;
pub mod instance;
pub mod validated;
pub mod validation;

pub use filter::{FilterCriterion, FilterError, FilterField, FilterState};
pub use instance::{Instance, InstanceStatus};
pub use validated::{CreateInstanceForm, FieldVerdict, ValidatedField};
pub use validation::ValidationError;
