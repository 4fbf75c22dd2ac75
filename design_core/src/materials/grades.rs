//! Concrete and Steel Grades
//!
//! Grade designations per IS 456 (concrete) and IS 1786 (reinforcement).
//! A grade is a closed enum carrying its characteristic strength; the
//! section search iterates the standard grade-pair table below.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Concrete grade (characteristic cube strength)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ConcreteGrade {
    /// M15 (plain/lean work, rarely used for beams)
    M15,
    /// M20 (minimum for reinforced work in mild exposure)
    M20,
    /// M25
    #[default]
    M25,
    /// M30
    M30,
    /// M35
    M35,
    /// M40
    M40,
}

impl ConcreteGrade {
    /// All grades, ascending by strength
    pub const ALL: [ConcreteGrade; 6] = [
        ConcreteGrade::M15,
        ConcreteGrade::M20,
        ConcreteGrade::M25,
        ConcreteGrade::M30,
        ConcreteGrade::M35,
        ConcreteGrade::M40,
    ];

    /// Characteristic compressive strength fck (N/mm^2)
    pub fn fck_mpa(&self) -> f64 {
        match self {
            ConcreteGrade::M15 => 15.0,
            ConcreteGrade::M20 => 20.0,
            ConcreteGrade::M25 => 25.0,
            ConcreteGrade::M30 => 30.0,
            ConcreteGrade::M35 => 35.0,
            ConcreteGrade::M40 => 40.0,
        }
    }

    /// Grade designation (e.g., "M25")
    pub fn display_name(&self) -> &'static str {
        match self {
            ConcreteGrade::M15 => "M15",
            ConcreteGrade::M20 => "M20",
            ConcreteGrade::M25 => "M25",
            ConcreteGrade::M30 => "M30",
            ConcreteGrade::M35 => "M35",
            ConcreteGrade::M40 => "M40",
        }
    }
}

impl std::fmt::Display for ConcreteGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Reinforcement steel grade (characteristic yield strength)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum SteelGrade {
    /// Fe250 mild steel (stirrups on older work)
    Fe250,
    /// Fe415 deformed bars
    Fe415,
    /// Fe500 deformed bars (current default)
    #[default]
    Fe500,
    /// Fe550 high-strength deformed bars
    Fe550,
}

impl SteelGrade {
    /// All grades, ascending by strength
    pub const ALL: [SteelGrade; 4] = [
        SteelGrade::Fe250,
        SteelGrade::Fe415,
        SteelGrade::Fe500,
        SteelGrade::Fe550,
    ];

    /// Characteristic yield strength fy (N/mm^2)
    pub fn fy_mpa(&self) -> f64 {
        match self {
            SteelGrade::Fe250 => 250.0,
            SteelGrade::Fe415 => 415.0,
            SteelGrade::Fe500 => 500.0,
            SteelGrade::Fe550 => 550.0,
        }
    }

    /// Grade designation (e.g., "Fe500")
    pub fn display_name(&self) -> &'static str {
        match self {
            SteelGrade::Fe250 => "Fe250",
            SteelGrade::Fe415 => "Fe415",
            SteelGrade::Fe500 => "Fe500",
            SteelGrade::Fe550 => "Fe550",
        }
    }
}

impl std::fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A concrete/steel grade combination considered by the section search
pub type GradePair = (ConcreteGrade, SteelGrade);

/// Standard grade combinations for cast-in-place beam work.
///
/// M15 is excluded (below the reinforced-work minimum) and Fe250 is kept
/// out of main-steel pairs. Ordered cheapest-first so equal-cost ties
/// resolve toward the lower grades.
pub static STANDARD_GRADE_PAIRS: Lazy<Vec<GradePair>> = Lazy::new(|| {
    let mut pairs = Vec::new();
    for concrete in [
        ConcreteGrade::M20,
        ConcreteGrade::M25,
        ConcreteGrade::M30,
        ConcreteGrade::M35,
        ConcreteGrade::M40,
    ] {
        for steel in [SteelGrade::Fe415, SteelGrade::Fe500] {
            pairs.push((concrete, steel));
        }
    }
    pairs
});
