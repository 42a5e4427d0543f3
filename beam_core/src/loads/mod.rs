//! Applied loads and their resultants
//!
//! # Overview
//!
//! - [`Load`] - Tagged enum of point forces, distributed loads, moments and axial forces
//! - [`LoadKind`] - Load category with short codes (P, q, C, H)
//! - [`LoadResultant`] - Global totals used by the equilibrium equations
//!
//! # Example
//!
//! ```
//! use beam_core::loads::{Load, LoadResultant};
//!
//! let loads = vec![
//!     Load::point(100.0, 5.0),
//!     Load::distributed(10.0, 0.0, 10.0),
//! ];
//!
//! let total = LoadResultant::of(&loads);
//! assert_eq!(total.vertical, 200.0);
//! // Both resultants act at midspan: no net moment there
//! assert!(total.moment_about(5.0).abs() < 1e-9);
//! ```

pub mod load_types;

pub use load_types::{Load, LoadKind};

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;

/// Global resultant of a set of loads
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadResultant {
    /// Total downward force (N)
    pub vertical: f64,
    /// Total force along +x (N)
    pub horizontal: f64,
    /// Counter-clockwise moment about x = 0 (N·m)
    pub moment_about_origin: f64,
}

impl LoadResultant {
    /// Sum a set of loads
    pub fn of(loads: &[Load]) -> Self {
        loads.iter().fold(LoadResultant::default(), |acc, load| LoadResultant {
            vertical: acc.vertical + load.vertical_force(),
            horizontal: acc.horizontal + load.horizontal_force(),
            moment_about_origin: acc.moment_about_origin + load.moment_about(0.0),
        })
    }

    /// Counter-clockwise moment about the point `x` (N·m)
    pub fn moment_about(&self, x: f64) -> f64 {
        // Shifting the reference point right by x adds F·x for downward F
        self.moment_about_origin + self.vertical * x
    }
}

/// Validate every load against a beam of the given length.
pub fn validate_loads(loads: &[Load], beam_length: f64) -> CalcResult<()> {
    loads
        .iter()
        .enumerate()
        .try_for_each(|(i, load)| load.validate(i, beam_length))
}

/// Largest absolute force-like magnitude in a load set, used to scale tolerances
pub(crate) fn magnitude_scale(loads: &[Load], beam_length: f64) -> f64 {
    loads
        .iter()
        .map(|load| {
            load.vertical_force().abs()
                + load.horizontal_force().abs()
                + load.moment_about(0.0).abs() / beam_length
        })
        .fold(1.0, f64::max)
}
