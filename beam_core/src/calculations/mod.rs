//! # Statics Calculations
//!
//! The computational core. Both entry points are pure functions of their
//! arguments:
//!
//! - [`solve_reactions`] - `(beam, loads) -> ReactionSet`
//! - [`compute_internal_forces`] - `(beam, loads, reactions) -> InternalForces`
//!
//! ## Available Modules
//!
//! - [`reactions`] - Closed-form equilibrium solution for support reactions
//! - [`piecewise`] - Piecewise polynomials, critical points and extremes
//! - [`internal_forces`] - Sweep producing V(x), M(x) and N(x)
//!
//! All results are plain data implementing `Serialize`/`Deserialize`, ready
//! for a plotting layer or exporter to consume.

pub mod internal_forces;
pub mod piecewise;
pub mod reactions;

// Re-export commonly used types
pub use internal_forces::{compute_internal_forces, ForceSample, ForceSummary, InternalForces};
pub use piecewise::{
    CriticalKind, CriticalPoint, Extreme, ForceComponent, InternalForceFunction, Piece,
};
pub use reactions::{solve_reactions, EquilibriumResidual, ReactionSet, SupportReaction};

/// Relative tolerance for equilibrium checks and critical point detection.
///
/// Scaled by the largest load or reaction magnitude (and by the beam length
/// for moments) before use.
pub const RELATIVE_TOLERANCE: f64 = 1e-9;
