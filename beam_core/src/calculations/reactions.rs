//! Support Reaction Solver
//!
//! Solves the three planar equilibrium equations for a statically determinate
//! beam in closed form:
//!
//! - ΣFy = 0 (vertical forces)
//! - ΣFx = 0 (horizontal forces)
//! - ΣM = 0 (moments about a support)
//!
//! Distributed loads enter as their resultant (intensity × length) acting at
//! the interval midpoint.
//!
//! ## Sign Convention
//! - Vertical reaction: positive upward
//! - Horizontal reaction: positive toward +x
//! - Reaction moment: positive counter-clockwise
//!
//! ## Example
//! ```rust
//! use beam_core::beam::Beam;
//! use beam_core::loads::Load;
//! use beam_core::calculations::reactions::solve_reactions;
//!
//! let beam = Beam::simply_supported(10.0);
//! let reactions = solve_reactions(&beam, &[Load::point(100.0, 5.0)]).unwrap();
//!
//! assert!((reactions[0].vertical - 50.0).abs() < 1e-9);
//! assert!((reactions[1].vertical - 50.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::beam::{Beam, BeamConfiguration, Support};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{magnitude_scale, validate_loads, Load, LoadResultant};

use super::RELATIVE_TOLERANCE;

/// Resolved reaction components at one support
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportReaction {
    /// The support these components belong to
    pub support: Support,
    /// Vertical force (N), positive upward
    pub vertical: f64,
    /// Horizontal force (N), positive toward +x; `None` for rollers
    pub horizontal: Option<f64>,
    /// Reaction moment (N·m), positive counter-clockwise; fixed supports only
    pub moment: Option<f64>,
}

impl SupportReaction {
    /// Counter-clockwise moment of this reaction about the point `x` (N·m)
    pub fn moment_about(&self, x: f64) -> f64 {
        self.vertical * (self.support.position - x) + self.moment.unwrap_or(0.0)
    }
}

/// Residual of the equilibrium equations for a reaction set and its loads.
///
/// All components are zero (to rounding) for a correct solution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EquilibriumResidual {
    /// ΣFy, upward positive (N)
    pub vertical: f64,
    /// ΣFx (N)
    pub horizontal: f64,
    /// ΣM about x = 0, counter-clockwise positive (N·m)
    pub moment: f64,
}

impl EquilibriumResidual {
    /// True when every component is within tolerance of zero
    pub fn is_balanced(&self, force_tolerance: f64, moment_tolerance: f64) -> bool {
        self.vertical.abs() <= force_tolerance
            && self.horizontal.abs() <= force_tolerance
            && self.moment.abs() <= moment_tolerance
    }
}

/// Reactions at every support of a beam, in the beam's support order.
///
/// Computed once per (beam, loads) pair by [`solve_reactions`] and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionSet {
    reactions: Vec<SupportReaction>,
}

impl ReactionSet {
    /// Build a reaction set from explicit components.
    ///
    /// Normally produced by [`solve_reactions`]; this constructor exists for
    /// callers that receive reactions from elsewhere (e.g. a saved result).
    pub fn from_reactions(reactions: Vec<SupportReaction>) -> Self {
        ReactionSet { reactions }
    }

    /// Reaction at the support with the given index
    pub fn get(&self, index: usize) -> Option<&SupportReaction> {
        self.reactions.get(index)
    }

    /// Iterate reactions in support order
    pub fn iter(&self) -> impl Iterator<Item = &SupportReaction> {
        self.reactions.iter()
    }

    /// Number of supports
    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    /// True if there are no reactions
    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Sum of vertical reactions (N), upward positive
    pub fn total_vertical(&self) -> f64 {
        self.reactions.iter().map(|r| r.vertical).sum()
    }

    /// Sum of horizontal reactions (N)
    pub fn total_horizontal(&self) -> f64 {
        self.reactions.iter().filter_map(|r| r.horizontal).sum()
    }

    /// Equilibrium residual of these reactions acting together with `loads`
    pub fn residual(&self, loads: &[Load]) -> EquilibriumResidual {
        let applied = LoadResultant::of(loads);
        EquilibriumResidual {
            vertical: self.total_vertical() - applied.vertical,
            horizontal: self.total_horizontal() + applied.horizontal,
            moment: self
                .reactions
                .iter()
                .map(|r| r.moment_about(0.0))
                .sum::<f64>()
                + applied.moment_about_origin,
        }
    }

    /// Check that this reaction set belongs to `beam` and balances `loads`.
    ///
    /// Fails with [`CalcError::Configuration`] when the support list differs
    /// (count, kind, position), when a component is present on a support that
    /// cannot exert it (or missing where it must), or when the reactions do
    /// not satisfy equilibrium with the given loads.
    pub fn check_against(&self, beam: &Beam, loads: &[Load]) -> CalcResult<()> {
        let subject = "reaction set";

        if self.reactions.len() != beam.supports.len() {
            return Err(CalcError::configuration(
                subject,
                format!(
                    "has {} reactions but {} has {} supports",
                    self.reactions.len(),
                    beam.subject(),
                    beam.supports.len()
                ),
            ));
        }

        for (i, (reaction, support)) in self.reactions.iter().zip(&beam.supports).enumerate() {
            if reaction.support != *support {
                return Err(CalcError::configuration(
                    format!("{} entry {}", subject, i),
                    format!(
                        "belongs to a {} but the beam has a {}",
                        reaction.support, support
                    ),
                ));
            }
            if reaction.horizontal.is_some() != support.kind.restrains_horizontal()
                || reaction.moment.is_some() != support.kind.restrains_rotation()
            {
                return Err(CalcError::configuration(
                    format!("{} entry {}", subject, i),
                    format!("components do not match a {} support", support.kind),
                ));
            }
            let values = [
                Some(reaction.vertical),
                reaction.horizontal,
                reaction.moment,
            ];
            if values.iter().flatten().any(|v| !v.is_finite()) {
                return Err(CalcError::configuration(
                    format!("{} entry {}", subject, i),
                    "reaction components must be finite",
                ));
            }
        }

        let (force_tol, moment_tol) = tolerances(loads, beam.length);
        let residual = self.residual(loads);
        if !residual.is_balanced(force_tol, moment_tol) {
            return Err(CalcError::configuration(
                subject,
                format!(
                    "does not balance the applied loads (ΣFy = {:.3e}, ΣFx = {:.3e}, ΣM = {:.3e})",
                    residual.vertical, residual.horizontal, residual.moment
                ),
            ));
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for ReactionSet {
    type Output = SupportReaction;

    fn index(&self, index: usize) -> &SupportReaction {
        &self.reactions[index]
    }
}

impl<'a> IntoIterator for &'a ReactionSet {
    type Item = &'a SupportReaction;
    type IntoIter = std::slice::Iter<'a, SupportReaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.reactions.iter()
    }
}

/// Force and moment tolerances scaled to the magnitude of the loads
pub(crate) fn tolerances(loads: &[Load], beam_length: f64) -> (f64, f64) {
    let force = RELATIVE_TOLERANCE * magnitude_scale(loads, beam_length);
    (force, force * beam_length.max(1.0))
}

/// Solve the support reactions of a statically determinate beam.
///
/// # Errors
///
/// - [`CalcError::InvalidInput`] for a non-positive length, a reversed
///   distributed-load interval or non-finite values
/// - [`CalcError::Configuration`] for an indeterminate or unstable support
///   set, or any support/load position outside `[0, L]`
pub fn solve_reactions(beam: &Beam, loads: &[Load]) -> CalcResult<ReactionSet> {
    let configuration = beam.configuration()?;
    validate_loads(loads, beam.length)?;

    let applied = LoadResultant::of(loads);
    let mut reactions: Vec<SupportReaction> = beam
        .supports
        .iter()
        .map(|support| SupportReaction {
            support: *support,
            vertical: 0.0,
            horizontal: None,
            moment: None,
        })
        .collect();

    match configuration {
        BeamConfiguration::Cantilever { fixed } => {
            let a = beam.supports[fixed].position;
            // ΣM_a = 0: M_a + Σ M_loads(a) = 0
            reactions[fixed].vertical = applied.vertical;
            reactions[fixed].horizontal = Some(-applied.horizontal);
            reactions[fixed].moment = Some(-applied.moment_about(a));
        }
        BeamConfiguration::PinRoller { pin, roller } => {
            let a = beam.supports[pin].position;
            let b = beam.supports[roller].position;
            // ΣM_a = 0: R_b·(b - a) + Σ M_loads(a) = 0
            let r_roller = -applied.moment_about(a) / (b - a);
            reactions[roller].vertical = r_roller;
            reactions[pin].vertical = applied.vertical - r_roller;
            reactions[pin].horizontal = Some(-applied.horizontal);
        }
    }

    let reactions = ReactionSet { reactions };

    let (force_tol, moment_tol) = tolerances(loads, beam.length);
    let residual = reactions.residual(loads);
    if !residual.is_balanced(force_tol, moment_tol) {
        tracing::warn!(
            beam = %beam.subject(),
            vertical = residual.vertical,
            horizontal = residual.horizontal,
            moment = residual.moment,
            "equilibrium residual exceeds tolerance"
        );
    }

    tracing::debug!(
        beam = %beam.subject(),
        configuration = configuration.display_name(),
        loads = loads.len(),
        total_vertical = reactions.total_vertical(),
        "solved support reactions"
    );

    Ok(reactions)
}
