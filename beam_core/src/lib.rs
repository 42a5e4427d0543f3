//! # beam_core - Statically Determinate Beam Analysis
//!
//! `beam_core` computes support reactions and exact internal-force diagrams
//! for straight beams that statics alone can solve: simply supported beams,
//! cantilevers, and pin + roller beams with overhangs. All inputs and outputs
//! are JSON-serializable so that plotting layers, exporters or other tools can
//! consume them directly.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Exact**: Closed-form piecewise polynomials, no numerical integration
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types naming the offending beam/load
//!
//! ## Quick Start
//!
//! ```rust
//! use beam_core::{compute_internal_forces, solve_reactions, Beam, Load};
//!
//! let beam = Beam::simply_supported(10.0);
//! let loads = vec![Load::point(100.0, 5.0)];
//!
//! let reactions = solve_reactions(&beam, &loads)?;
//! let forces = compute_internal_forces(&beam, &loads, &reactions)?;
//!
//! assert!((forces.moment.evaluate(5.0)? - 250.0).abs() < 1e-9);
//! for point in forces.moment.critical_points() {
//!     println!("{:?} at x = {} m: {} N·m", point.kind, point.x, point.value);
//! }
//! # Ok::<(), beam_core::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`beam`] - Beam geometry, supports and determinacy checks
//! - [`loads`] - Applied load definitions and resultants
//! - [`calculations`] - Reaction solver and internal-force evaluator
//! - [`project`] - Project document, metadata and analysis settings
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic saves and versioned loads of `.beam` files

pub mod beam;
pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod project;

// Re-export commonly used types at crate root for convenience
pub use beam::{Beam, BeamConfiguration, Support, SupportKind};
pub use calculations::{
    compute_internal_forces, solve_reactions, CriticalKind, CriticalPoint, ForceComponent,
    InternalForceFunction, InternalForces, ReactionSet, SupportReaction,
};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project};
pub use loads::{Load, LoadKind};
pub use project::{AnalysisSettings, BeamAnalysis, Project, ProjectMetadata};
