//! # design_core - Reinforced-Concrete Beam Design Engine
//!
//! `design_core` turns factored beam demands into buildable designs: a
//! constructible bar layout, a minimum-cost section and material choice,
//! and a bar-bending schedule with a cutting plan a site crew can execute.
//! All inputs and outputs are JSON-serializable, so the engine drops
//! cleanly behind any interface layer.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions that take input and return results
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Failures are data**: a candidate that breaks a code rule is recorded
//!   and ranked past, never thrown; only malformed input raises
//! - **Injected configuration**: catalogs, grids, and cost tables arrive as
//!   arguments, so concurrent runs never interfere
//!
//! ## Quick Start
//!
//! ```rust
//! use design_core::arrangement::{ArrangementInput, optimize_arrangement};
//!
//! let input = ArrangementInput {
//!     ast_required_mm2: 1130.0,
//!     b_mm: 300.0,
//!     ..ArrangementInput::default()
//! };
//!
//! let result = optimize_arrangement(&input).unwrap();
//! assert!(result.is_feasible);
//! ```
//!
//! ## Modules
//!
//! - [`arrangement`] - bar layout search under spacing and layer rules
//! - [`section`] - minimum-cost width/depth/grade grid search
//! - [`fabrication`] - cut lengths, bar marks, and cutting-stock packing
//! - [`materials`] - bar catalog and grade tables
//! - [`strength`] - the consumed flexure/shear calculator interface
//! - [`project`] - job container and office defaults
//! - [`errors`] - structured error types

pub mod arrangement;
pub mod errors;
pub mod fabrication;
pub mod materials;
pub mod project;
pub mod section;
pub mod strength;

// Re-export commonly used types at crate root for convenience
pub use arrangement::{optimize_arrangement, ArrangementInput, ArrangementResult, Objective};
pub use errors::{DesignError, DesignResult};
pub use fabrication::{generate_cutting_plan, BarBendingSchedule, ScheduleInput};
pub use project::{GlobalSettings, Project, ProjectMetadata};
pub use section::{optimize_section, CancelToken, CostProfile, OptimizationResult, SectionGrid};
pub use strength::{FlexureShearCalculator, StrengthEvaluation};
