//! Core types for the Mycel trail simulation.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! identifiers, the immutable [`SpeciesProfileTable`], and the error enums
//! shared by the grid, kernel, and engine crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod species;

pub use error::{AgentError, ConfigError, ResourceError, StepError};
pub use id::{SpeciesId, TickId};
pub use species::{SpeciesArrays, SpeciesProfile, SpeciesProfileTable};
