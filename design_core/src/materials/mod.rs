//! # Materials Database
//!
//! Static material tables for reinforced-concrete beam design: the
//! reinforcement bar catalog and the concrete/steel grade designations.
//! Everything here is immutable reference data; search loops read it only
//! through the arguments they are handed.
//!
//! ## Example
//!
//! ```rust
//! use design_core::materials::{BarSize, ConcreteGrade, SteelGrade};
//!
//! let bar = BarSize::D20;
//! assert!((bar.area_mm2() - 314.159).abs() < 0.01);
//!
//! let pair = (ConcreteGrade::M25, SteelGrade::Fe500);
//! assert_eq!(pair.0.fck_mpa(), 25.0);
//! ```

pub mod grades;
pub mod rebar;

// Re-export catalog types
pub use rebar::BarSize;

// Re-export grade types
pub use grades::{ConcreteGrade, GradePair, SteelGrade, STANDARD_GRADE_PAIRS};
