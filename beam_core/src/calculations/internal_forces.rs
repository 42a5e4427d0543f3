//! Internal-Force Evaluator
//!
//! Sweeps a solved beam from x = 0 to x = L and builds the shear V(x),
//! bending moment M(x) and axial force N(x) as exact piecewise polynomials.
//!
//! ## Sign Convention (free body left of the cut)
//! - V(x) = Σ upward forces left of x
//! - M(x) = Σ F_up·(x − x_i) − Σ C_left; positive = sagging
//! - N(x) = −Σ Fx left of x; positive = tension
//!
//! Consequently dM/dx = V wherever V is continuous, V drops by P under a
//! downward point force, and M drops by C at a counter-clockwise moment C.
//!
//! ## Example
//! ```rust
//! use beam_core::beam::Beam;
//! use beam_core::loads::Load;
//! use beam_core::calculations::{compute_internal_forces, solve_reactions};
//!
//! let beam = Beam::simply_supported(10.0);
//! let loads = vec![Load::distributed(10.0, 0.0, 10.0)];
//! let reactions = solve_reactions(&beam, &loads).unwrap();
//! let forces = compute_internal_forces(&beam, &loads, &reactions).unwrap();
//!
//! assert!((forces.moment.evaluate(5.0).unwrap() - 125.0).abs() < 1e-9);
//! assert!(forces.shear.evaluate(5.0).unwrap().abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::beam::Beam;
use crate::errors::CalcResult;
use crate::loads::{magnitude_scale, validate_loads, Load};

use super::piecewise::{Extreme, ForceComponent, InternalForceFunction, Piece};
use super::reactions::ReactionSet;
use super::RELATIVE_TOLERANCE;

/// Shear, moment and axial force along a beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalForces {
    /// Beam length (m)
    pub length: f64,
    /// Shear force V(x) (N)
    pub shear: InternalForceFunction,
    /// Bending moment M(x) (N·m)
    pub moment: InternalForceFunction,
    /// Axial force N(x) (N)
    pub axial: InternalForceFunction,
}

/// One row of a sampled diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSample {
    /// Position (m)
    pub x: f64,
    /// Shear force (N)
    pub shear: f64,
    /// Bending moment (N·m)
    pub moment: f64,
    /// Axial force (N)
    pub axial: f64,
}

/// Largest and smallest values of each internal force
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceSummary {
    pub max_shear: Extreme,
    pub min_shear: Extreme,
    pub max_moment: Extreme,
    pub min_moment: Extreme,
    pub max_axial: Extreme,
    pub min_axial: Extreme,
}

impl InternalForces {
    /// Function for a given component
    pub fn get(&self, component: ForceComponent) -> &InternalForceFunction {
        match component {
            ForceComponent::Shear => &self.shear,
            ForceComponent::Moment => &self.moment,
            ForceComponent::Axial => &self.axial,
        }
    }

    /// Segment boundaries shared by all three functions
    pub fn breakpoints(&self) -> Vec<f64> {
        self.shear.breakpoints()
    }

    /// Sample (x, V, M, N) rows for plotting or export.
    ///
    /// Uses a uniform grid of `points` positions (at least 2) plus every
    /// segment boundary. Where any component jumps, two rows are emitted at
    /// the same x: the left-hand limit followed by the right-hand limit.
    pub fn sample(&self, points: usize) -> Vec<ForceSample> {
        let points = points.max(2);
        let boundaries = self.breakpoints();
        let eps = 1e-9 * self.length.max(1.0);

        let mut positions: Vec<f64> = (0..points)
            .map(|i| self.length * i as f64 / (points - 1) as f64)
            .filter(|x| {
                let i = boundaries.partition_point(|b| b < x);
                let near = |j: usize| boundaries.get(j).is_some_and(|b| (b - x).abs() <= eps);
                !(near(i) || (i > 0 && near(i - 1)))
            })
            .collect();
        positions.extend_from_slice(&boundaries);
        positions.sort_by(f64::total_cmp);

        let mut rows = Vec::with_capacity(positions.len() + boundaries.len());
        for x in positions {
            let right = self.row(x, InternalForceFunction::right_value);
            let interior = x > 0.0 && x < self.length;
            if interior {
                let left = self.row(x, InternalForceFunction::left_value);
                let jumps = ForceComponent::ALL.iter().any(|&c| {
                    let f = self.get(c);
                    (f.right_value(x) - f.left_value(x)).abs() > f.tolerance()
                });
                if jumps {
                    rows.push(left);
                }
            }
            rows.push(right);
        }
        rows
    }

    fn row(&self, x: f64, value: fn(&InternalForceFunction, f64) -> f64) -> ForceSample {
        ForceSample {
            x,
            shear: value(&self.shear, x),
            moment: value(&self.moment, x),
            axial: value(&self.axial, x),
        }
    }

    /// Maxima and minima of V, M and N
    pub fn summary(&self) -> ForceSummary {
        ForceSummary {
            max_shear: self.shear.max(),
            min_shear: self.shear.min(),
            max_moment: self.moment.max(),
            min_moment: self.moment.min(),
            max_axial: self.axial.max(),
            min_axial: self.axial.min(),
        }
    }
}

/// Concentrated actions gathered at one boundary
#[derive(Debug, Clone, Copy, Default)]
struct Concentrated {
    /// Upward force (N)
    up: f64,
    /// Counter-clockwise couple (N·m)
    couple: f64,
    /// Force toward +x (N)
    along: f64,
}

/// Sorted, merged segment boundaries: 0, L, supports, load positions
fn segment_boundaries(beam: &Beam, loads: &[Load]) -> Vec<f64> {
    let length = beam.length;
    let eps = 1e-12 * length.max(1.0);

    let mut xs: Vec<f64> = vec![0.0, length];
    xs.extend(beam.supports.iter().map(|s| s.position));
    xs.extend(loads.iter().flat_map(|l| l.positions()));
    xs.sort_by(f64::total_cmp);
    xs.dedup_by(|b, a| (*b - *a).abs() <= eps);

    // Clusters at the ends keep the exact end coordinates
    if let Some(first) = xs.first_mut() {
        *first = 0.0;
    }
    if let Some(last) = xs.last_mut() {
        *last = length;
    }
    xs
}

/// Index of the boundary closest to x
fn nearest(boundaries: &[f64], x: f64) -> usize {
    let i = boundaries.partition_point(|b| *b < x);
    if i == 0 {
        0
    } else if i == boundaries.len() || (x - boundaries[i - 1]) < (boundaries[i] - x) {
        i - 1
    } else {
        i
    }
}

/// Build V(x), M(x) and N(x) for a beam, its loads and its solved reactions.
///
/// # Errors
///
/// - [`crate::errors::CalcError::InvalidInput`] / [`crate::errors::CalcError::Configuration`]
///   for an invalid beam or load set, as in [`super::solve_reactions`]
/// - [`crate::errors::CalcError::Configuration`] when `reactions` does not
///   belong to this beam (support count, kind or position differ) or does not
///   balance `loads`
pub fn compute_internal_forces(
    beam: &Beam,
    loads: &[Load],
    reactions: &ReactionSet,
) -> CalcResult<InternalForces> {
    beam.configuration()?;
    validate_loads(loads, beam.length)?;
    reactions.check_against(beam, loads)?;

    let boundaries = segment_boundaries(beam, loads);

    let mut actions = vec![Concentrated::default(); boundaries.len()];
    for reaction in reactions {
        let action = &mut actions[nearest(&boundaries, reaction.support.position)];
        action.up += reaction.vertical;
        action.along += reaction.horizontal.unwrap_or(0.0);
        action.couple += reaction.moment.unwrap_or(0.0);
    }
    for load in loads {
        match *load {
            Load::PointForce {
                position,
                magnitude,
            } => actions[nearest(&boundaries, position)].up -= magnitude,
            Load::Moment {
                position,
                magnitude,
            } => actions[nearest(&boundaries, position)].couple += magnitude,
            Load::AxialForce {
                position,
                magnitude,
            } => actions[nearest(&boundaries, position)].along += magnitude,
            Load::DistributedLoad { .. } => {}
        }
    }

    let segments = boundaries.len() - 1;
    let mut shear = Vec::with_capacity(segments);
    let mut moment = Vec::with_capacity(segments);
    let mut axial = Vec::with_capacity(segments);

    let (mut v, mut m, mut n) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (k, window) in boundaries.windows(2).enumerate() {
        let (a, b) = (window[0], window[1]);
        let action = actions[k];
        v += action.up;
        m -= action.couple;
        n -= action.along;

        let q: f64 = loads.iter().map(|l| l.intensity_over(a, b)).sum();
        shear.push(Piece::new(a, b, [v, -q, 0.0]));
        moment.push(Piece::new(a, b, [m, v, -q / 2.0]));
        axial.push(Piece::new(a, b, [n, 0.0, 0.0]));

        let h = b - a;
        m += h * (v - q * h / 2.0);
        v -= q * h;
    }

    let scale = reactions
        .iter()
        .map(|r| {
            r.vertical.abs()
                + r.horizontal.unwrap_or(0.0).abs()
                + r.moment.unwrap_or(0.0).abs() / beam.length
        })
        .fold(magnitude_scale(loads, beam.length), f64::max);
    let force_tol = RELATIVE_TOLERANCE * scale;
    let moment_tol = force_tol * beam.length.max(1.0);

    tracing::debug!(
        beam = %beam.subject(),
        segments,
        "computed internal forces"
    );

    Ok(InternalForces {
        length: beam.length,
        shear: InternalForceFunction::new(ForceComponent::Shear, shear, force_tol)?,
        moment: InternalForceFunction::new(ForceComponent::Moment, moment, moment_tol)?,
        axial: InternalForceFunction::new(ForceComponent::Axial, axial, force_tol)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beam::SupportKind;
    use crate::calculations::piecewise::CriticalKind;
    use crate::calculations::reactions::solve_reactions;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn analyze(beam: &Beam, loads: &[Load]) -> InternalForces {
        let reactions = solve_reactions(beam, loads).unwrap();
        compute_internal_forces(beam, loads, &reactions).unwrap()
    }

    #[test]
    fn test_boundaries_merge_and_sort() {
        let beam = Beam::overhanging(12.0, 2.0, 10.0);
        let loads = vec![
            Load::point(1.0, 5.0),
            Load::distributed(1.0, 3.0, 5.0),
            Load::moment(1.0, 10.0),
        ];
        assert_eq!(
            segment_boundaries(&beam, &loads),
            vec![0.0, 2.0, 3.0, 5.0, 10.0, 12.0]
        );
    }

    #[test]
    fn test_nearest_boundary() {
        let b = [0.0, 2.0, 5.0, 10.0];
        assert_eq!(nearest(&b, 0.0), 0);
        assert_eq!(nearest(&b, 5.0), 2);
        assert_eq!(nearest(&b, 4.999999999999), 2);
        assert_eq!(nearest(&b, 10.0), 3);
    }

    #[test]
    fn test_simply_supported_point_load() {
        let forces = analyze(&Beam::simply_supported(10.0), &[Load::point(100.0, 5.0)]);

        assert_eq!(forces.shear.pieces().len(), 2);
        assert_relative_eq!(forces.shear.evaluate(2.0).unwrap(), 50.0);
        assert_relative_eq!(forces.shear.evaluate(7.0).unwrap(), -50.0);
        assert_relative_eq!(forces.moment.evaluate(5.0).unwrap(), 250.0);
        assert_abs_diff_eq!(forces.moment.evaluate(0.0).unwrap(), 0.0);
        assert_abs_diff_eq!(forces.moment.evaluate(10.0).unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(forces.moment.max(), Extreme { x: 5.0, value: 250.0 });
    }

    #[test]
    fn test_cantilever_tip_load() {
        let forces = analyze(&Beam::cantilever(5.0), &[Load::point(20.0, 5.0)]);

        for x in [0.0, 1.0, 2.5, 5.0] {
            assert_relative_eq!(forces.shear.evaluate(x).unwrap(), 20.0);
            assert_abs_diff_eq!(
                forces.moment.evaluate(x).unwrap(),
                -20.0 * (5.0 - x),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_right_cantilever_free_end_is_zero() {
        let forces = analyze(&Beam::cantilever_right(4.0), &[Load::distributed(10.0, 0.0, 4.0)]);

        assert_abs_diff_eq!(forces.shear.evaluate(0.0).unwrap(), 0.0);
        assert_relative_eq!(forces.shear.evaluate(4.0).unwrap(), -40.0);
        // Hogging at the wall: −q·L²/2
        assert_relative_eq!(forces.moment.evaluate(4.0).unwrap(), -80.0, epsilon = 1e-9);
    }

    #[test]
    fn test_applied_moment_jump() {
        let beam = Beam::simply_supported(10.0);
        let forces = analyze(&beam, &[Load::moment(100.0, 4.0)]);

        // R_A = +10: M rises to 40, drops by 100 at x = 4, returns to 0
        assert_relative_eq!(forces.moment.left_limit(4.0).unwrap(), 40.0);
        assert_relative_eq!(forces.moment.evaluate(4.0).unwrap(), -60.0);

        let jumps: Vec<_> = forces
            .moment
            .critical_points()
            .into_iter()
            .filter(|p| p.kind == CriticalKind::Discontinuity)
            .collect();
        assert_eq!(jumps.len(), 1);
        assert_relative_eq!(jumps[0].jump(), -100.0);
    }

    #[test]
    fn test_axial_force_diagram() {
        // Pin at 0 resists a 30 N pull applied at 6 m
        let beam = Beam::simply_supported(10.0);
        let forces = analyze(&beam, &[Load::axial(30.0, 6.0)]);

        assert_relative_eq!(forces.axial.evaluate(3.0).unwrap(), 30.0);
        assert_abs_diff_eq!(forces.axial.evaluate(8.0).unwrap(), 0.0);
        assert_abs_diff_eq!(forces.shear.max_abs().value, 0.0);
    }

    #[test]
    fn test_axial_with_roller_on_the_left() {
        let beam = Beam::new(10.0)
            .with_support(SupportKind::Roller, 0.0)
            .with_support(SupportKind::Pin, 10.0);
        let forces = analyze(&beam, &[Load::axial(-25.0, 4.0)]);

        assert_abs_diff_eq!(forces.axial.evaluate(2.0).unwrap(), 0.0);
        // Pulled toward −x and held at the right: tension between 4 and 10
        assert_relative_eq!(forces.axial.evaluate(7.0).unwrap(), 25.0);
    }

    #[test]
    fn test_rejects_foreign_reactions() {
        let loads = vec![Load::point(100.0, 5.0)];
        let reactions = solve_reactions(&Beam::simply_supported(10.0), &loads).unwrap();

        let err = compute_internal_forces(&Beam::simply_supported(8.0), &loads, &reactions)
            .unwrap_err();
        assert!(err.is_configuration());

        let err = compute_internal_forces(
            &Beam::simply_supported(10.0),
            &[Load::point(100.0, 3.0)],
            &reactions,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_sample_duplicates_discontinuities() {
        let forces = analyze(&Beam::simply_supported(10.0), &[Load::point(100.0, 5.0)]);
        let rows = forces.sample(11);

        // 11 grid points, x = 5 appears twice
        assert_eq!(rows.len(), 12);
        let at_five: Vec<_> = rows.iter().filter(|r| r.x == 5.0).collect();
        assert_eq!(at_five.len(), 2);
        assert_relative_eq!(at_five[0].shear, 50.0);
        assert_relative_eq!(at_five[1].shear, -50.0);
        assert_relative_eq!(at_five[1].moment, 250.0);
        assert!(rows.windows(2).all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn test_sample_minimum_points() {
        let forces = analyze(&Beam::cantilever(5.0), &[Load::point(20.0, 5.0)]);
        let rows = forces.sample(0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].x, 0.0);
        assert_eq!(rows[1].x, 5.0);
    }

    #[test]
    fn test_summary() {
        let forces = analyze(&Beam::simply_supported(10.0), &[Load::distributed(10.0, 0.0, 10.0)]);
        let summary = forces.summary();

        assert_relative_eq!(summary.max_moment.value, 125.0);
        assert_relative_eq!(summary.max_moment.x, 5.0);
        assert_relative_eq!(summary.max_shear.value, 50.0);
        assert_relative_eq!(summary.min_shear.value, -50.0);
        assert_eq!(summary.max_axial.value, 0.0);
    }
}
