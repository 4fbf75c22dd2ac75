//! Reinforcement Bar Catalog
//!
//! Standard deformed-bar sizes per IS 1786, with cross-sectional areas and
//! linear weights. The catalog is a closed enum: every value is a standard
//! market size, so "standard-size" is a property of the type itself.
//!
//! ## Derived Quantities
//!
//! - Area = pi * d^2 / 4 (mm^2)
//! - Unit weight = d^2 / 162 (kg/m), the conventional steel density relation

use serde::{Deserialize, Serialize};

/// Standard reinforcement bar size
///
/// Diameters follow the IS 1786 preferred series. Areas and weights are
/// computed, not tabulated, so they stay exact to the diameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum BarSize {
    /// 8 mm (stirrups, distribution steel)
    D8,
    /// 10 mm (stirrups, light main steel)
    D10,
    /// 12 mm
    D12,
    /// 16 mm
    #[default]
    D16,
    /// 20 mm
    D20,
    /// 25 mm
    D25,
    /// 32 mm
    D32,
    /// 40 mm (heavy sections only)
    D40,
}

impl BarSize {
    /// All standard sizes, ascending by diameter
    pub const ALL: [BarSize; 8] = [
        BarSize::D8,
        BarSize::D10,
        BarSize::D12,
        BarSize::D16,
        BarSize::D20,
        BarSize::D25,
        BarSize::D32,
        BarSize::D40,
    ];

    /// Default candidate set for beam flexural steel
    pub const BEAM_FLEXURE: [BarSize; 5] = [
        BarSize::D12,
        BarSize::D16,
        BarSize::D20,
        BarSize::D25,
        BarSize::D32,
    ];

    /// Common stirrup sizes
    pub const STIRRUPS: [BarSize; 3] = [BarSize::D8, BarSize::D10, BarSize::D12];

    /// Nominal diameter in millimeters
    pub fn diameter_mm(&self) -> f64 {
        match self {
            BarSize::D8 => 8.0,
            BarSize::D10 => 10.0,
            BarSize::D12 => 12.0,
            BarSize::D16 => 16.0,
            BarSize::D20 => 20.0,
            BarSize::D25 => 25.0,
            BarSize::D32 => 32.0,
            BarSize::D40 => 40.0,
        }
    }

    /// Cross-sectional area in mm^2 (pi * d^2 / 4)
    pub fn area_mm2(&self) -> f64 {
        let d = self.diameter_mm();
        std::f64::consts::PI * d * d / 4.0
    }

    /// Linear weight in kg/m (d^2 / 162)
    pub fn unit_weight_kg_per_m(&self) -> f64 {
        let d = self.diameter_mm();
        d * d / 162.0
    }

    /// Look up a standard size by diameter
    pub fn from_diameter(diameter_mm: f64) -> Option<Self> {
        BarSize::ALL
            .iter()
            .copied()
            .find(|size| (size.diameter_mm() - diameter_mm).abs() < 0.5)
    }

    /// Display designation (e.g., "16 mm dia")
    pub fn display_name(&self) -> String {
        format!("{} mm dia", self.diameter_mm() as u32)
    }
}

impl std::fmt::Display for BarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
