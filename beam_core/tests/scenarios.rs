//! End-to-end checks of the reaction solver and internal-force evaluator on
//! textbook beams with known closed-form answers.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use beam_core::calculations::{CriticalKind, CriticalPoint, InternalForces};
use beam_core::{
    compute_internal_forces, solve_reactions, Beam, CalcError, Load, ReactionSet, SupportKind,
};

fn solve(beam: &Beam, loads: &[Load]) -> (ReactionSet, InternalForces) {
    let reactions = solve_reactions(beam, loads).expect("determinate beam solves");
    let forces =
        compute_internal_forces(beam, loads, &reactions).expect("matching reactions evaluate");
    (reactions, forces)
}

fn of_kind(points: &[CriticalPoint], kind: CriticalKind) -> Vec<CriticalPoint> {
    points.iter().copied().filter(|p| p.kind == kind).collect()
}

/// Overhanging beam: pin at 2 m, roller at 10 m, 12 m long, mixed loads
fn overhanging_example() -> (Beam, Vec<Load>) {
    let beam = Beam::overhanging(12.0, 2.0, 10.0).with_label("OH-1");
    let loads = vec![
        Load::point(800.0, 1.0),
        Load::distributed(150.0, 3.0, 7.0),
        Load::point(1200.0, 5.0),
        Load::moment(600.0, 8.0),
        Load::point(600.0, 11.0),
    ];
    (beam, loads)
}

fn assorted_cases() -> Vec<(Beam, Vec<Load>)> {
    vec![
        (Beam::simply_supported(10.0), vec![Load::point(100.0, 5.0)]),
        (Beam::cantilever(5.0), vec![Load::point(20.0, 5.0), Load::moment(-15.0, 2.0)]),
        (
            Beam::cantilever_right(6.0),
            vec![Load::distributed(12.0, 0.0, 4.0), Load::axial(5.0, 1.0)],
        ),
        (
            Beam::new(9.0)
                .with_support(SupportKind::Roller, 1.5)
                .with_support(SupportKind::Pin, 7.0),
            vec![
                Load::point(35.0, 0.0),
                Load::distributed(-8.0, 2.0, 9.0),
                Load::moment(40.0, 4.0),
            ],
        ),
        overhanging_example(),
    ]
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn simply_supported_point_load_at_midspan() {
    let beam = Beam::simply_supported(10.0);
    let (reactions, forces) = solve(&beam, &[Load::point(100.0, 5.0)]);

    assert_relative_eq!(reactions[0].vertical, 50.0);
    assert_relative_eq!(reactions[1].vertical, 50.0);

    assert_relative_eq!(forces.moment.evaluate(5.0).unwrap(), 250.0);
    assert_abs_diff_eq!(forces.moment.evaluate(0.0).unwrap(), 0.0);
    assert_abs_diff_eq!(forces.moment.evaluate(10.0).unwrap(), 0.0, epsilon = 1e-9);

    let peak = forces.moment.max();
    assert_relative_eq!(peak.x, 5.0);
    assert_relative_eq!(peak.value, 250.0);

    let extrema = of_kind(&forces.moment.critical_points(), CriticalKind::Extremum);
    assert_eq!(extrema.len(), 1);
    assert_relative_eq!(extrema[0].x, 5.0);
}

#[test]
fn cantilever_with_tip_load() {
    let beam = Beam::cantilever(5.0);
    let (reactions, forces) = solve(&beam, &[Load::point(20.0, 5.0)]);

    assert_eq!(reactions.len(), 1);
    assert_relative_eq!(reactions[0].vertical, 20.0);
    assert_relative_eq!(reactions[0].moment.unwrap(), 100.0);

    for x in [0.0, 0.5, 2.0, 4.9, 5.0] {
        assert_relative_eq!(forces.shear.evaluate(x).unwrap().abs(), 20.0);
        assert_abs_diff_eq!(
            forces.moment.evaluate(x).unwrap(),
            -20.0 * (5.0 - x),
            epsilon = 1e-9
        );
    }

    // Hogging moment grows toward the wall
    assert_relative_eq!(forces.moment.min().value, -100.0);
    assert_abs_diff_eq!(forces.moment.min().x, 0.0);
}

#[test]
fn simply_supported_uniform_load() {
    let beam = Beam::simply_supported(10.0);
    let (reactions, forces) = solve(&beam, &[Load::distributed(10.0, 0.0, 10.0)]);

    assert_relative_eq!(reactions[0].vertical, 50.0);
    assert_relative_eq!(reactions[1].vertical, 50.0);

    let zeros = of_kind(&forces.shear.critical_points(), CriticalKind::Zero);
    assert_eq!(zeros.len(), 1);
    assert_relative_eq!(zeros[0].x, 5.0);

    let extrema = of_kind(&forces.moment.critical_points(), CriticalKind::Extremum);
    assert_eq!(extrema.len(), 1);
    assert_relative_eq!(extrema[0].x, zeros[0].x);
    assert_relative_eq!(extrema[0].value, 125.0);
}

#[test]
fn uniform_load_split_where_shear_vanishes() {
    // The axial load adds a piece boundary exactly at the zero of V
    let beam = Beam::simply_supported(10.0);
    let loads = [Load::distributed(10.0, 0.0, 10.0), Load::axial(3.0, 5.0)];
    let (_, forces) = solve(&beam, &loads);

    let zeros = of_kind(&forces.shear.critical_points(), CriticalKind::Zero);
    assert_eq!(zeros.len(), 1);
    assert_relative_eq!(zeros[0].x, 5.0);

    let extrema = of_kind(&forces.moment.critical_points(), CriticalKind::Extremum);
    assert_eq!(extrema.len(), 1);
    assert_relative_eq!(extrema[0].x, zeros[0].x);
    assert_relative_eq!(extrema[0].value, 125.0, max_relative = 1e-12);
}

#[test]
fn single_roller_is_rejected() {
    let beam = Beam::new(10.0).with_support(SupportKind::Roller, 0.0);
    let result = solve_reactions(&beam, &[Load::point(10.0, 5.0)]);

    match result {
        Err(CalcError::Configuration { subject, reason }) => {
            assert!(subject.contains("beam"));
            assert!(reason.contains("under-constrained"));
        }
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

#[test]
fn overhanging_beam_diagrams() {
    let (beam, loads) = overhanging_example();
    let (reactions, forces) = solve(&beam, &loads);

    assert_relative_eq!(reactions[0].vertical, 2025.0, epsilon = 1e-9);
    assert_relative_eq!(reactions[1].vertical, 1175.0, epsilon = 1e-9);

    let m = |x: f64| forces.moment.evaluate(x).unwrap();
    assert_relative_eq!(m(2.0), -800.0, epsilon = 1e-9);
    assert_relative_eq!(m(5.0), 2575.0, epsilon = 1e-9);
    assert_relative_eq!(forces.moment.left_limit(8.0).unwrap(), 1150.0, epsilon = 1e-9);
    assert_relative_eq!(m(8.0), 550.0, epsilon = 1e-9);
    assert_relative_eq!(m(10.0), -600.0, epsilon = 1e-9);
    assert_abs_diff_eq!(m(11.5), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(forces.shear.evaluate(11.5).unwrap(), 0.0, epsilon = 1e-9);

    // Shear changes sign through the 1200 N point load
    assert_relative_eq!(forces.shear.left_limit(5.0).unwrap(), 925.0, epsilon = 1e-9);
    assert_relative_eq!(forces.shear.evaluate(5.0).unwrap(), -275.0, epsilon = 1e-9);

    let summary = forces.summary();
    assert_relative_eq!(summary.max_moment.x, 5.0);
    assert_relative_eq!(summary.max_moment.value, 2575.0, epsilon = 1e-9);
    assert_relative_eq!(summary.min_moment.value, -800.0, epsilon = 1e-9);

    let zeros = of_kind(&forces.moment.critical_points(), CriticalKind::Zero);
    assert_eq!(zeros.len(), 2);
    assert_relative_eq!(zeros[0].x, 2.0 + 800.0 / 1225.0, epsilon = 1e-9);
    assert_relative_eq!(zeros[1].x, 8.0 + 550.0 / 575.0, epsilon = 1e-9);

    let jumps = of_kind(&forces.moment.critical_points(), CriticalKind::Discontinuity);
    assert_eq!(jumps.len(), 1);
    assert_relative_eq!(jumps[0].jump(), -600.0, epsilon = 1e-9);
}

#[test]
fn axial_force_only_from_axial_loads() {
    let beam = Beam::cantilever(5.0);
    let (reactions, forces) = solve(&beam, &[Load::axial(10.0, 5.0), Load::point(3.0, 2.0)]);

    assert_relative_eq!(reactions[0].horizontal.unwrap(), -10.0);
    assert_relative_eq!(forces.axial.evaluate(2.5).unwrap(), 10.0);
    assert_relative_eq!(forces.axial.evaluate(5.0).unwrap(), 10.0);

    let (_, plain) = solve(&beam, &[Load::point(3.0, 2.0)]);
    assert_abs_diff_eq!(plain.axial.max_abs().value, 0.0);
    assert!(plain.axial.critical_points().is_empty());
}

#[test]
fn reactions_from_another_beam_are_rejected() {
    let (beam, loads) = overhanging_example();
    let reactions = solve_reactions(&beam, &loads).unwrap();

    let moved = Beam::overhanging(12.0, 2.0, 9.0);
    let err = compute_internal_forces(&moved, &loads, &reactions).unwrap_err();
    assert!(err.is_configuration());

    let err = compute_internal_forces(&beam, &loads[..3], &reactions).unwrap_err();
    assert!(err.is_configuration());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn vertical_reactions_balance_applied_loads() {
    for (beam, loads) in assorted_cases() {
        let reactions = solve_reactions(&beam, &loads).unwrap();
        let applied: f64 = loads.iter().map(Load::vertical_force).sum();
        assert_relative_eq!(reactions.total_vertical(), applied, epsilon = 1e-9);
    }
}

#[test]
fn moments_vanish_about_any_point() {
    for (beam, loads) in assorted_cases() {
        let reactions = solve_reactions(&beam, &loads).unwrap();
        for i in 0..=8 {
            let x = beam.length * i as f64 / 8.0 - 3.0;
            let total: f64 = reactions.iter().map(|r| r.moment_about(x)).sum::<f64>()
                + loads.iter().map(|l| l.moment_about(x)).sum::<f64>();
            assert_abs_diff_eq!(total, 0.0, epsilon = 1e-8);
        }
    }
}

#[test]
fn shear_integrates_to_moment_change() {
    for (beam, loads) in assorted_cases() {
        let (_, forces) = solve(&beam, &loads);
        let length = beam.length;

        let jumps: f64 = of_kind(&forces.moment.critical_points(), CriticalKind::Discontinuity)
            .iter()
            .map(CriticalPoint::jump)
            .sum();
        let change = forces.moment.evaluate(length).unwrap() - forces.moment.evaluate(0.0).unwrap();

        assert_abs_diff_eq!(forces.shear.integral(), change - jumps, epsilon = 1e-8);
    }
}

#[test]
fn moment_ends_vanish_without_end_moment() {
    for beam in [Beam::simply_supported(7.0), Beam::overhanging(7.0, 1.0, 6.0)] {
        let loads = vec![Load::point(40.0, 2.0), Load::distributed(5.0, 0.5, 6.5)];
        let (_, forces) = solve(&beam, &loads);
        assert_abs_diff_eq!(forces.moment.evaluate(0.0).unwrap(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(forces.moment.evaluate(7.0).unwrap(), 0.0, epsilon = 1e-9);
    }
}

#[test]
fn moment_slope_matches_shear() {
    let h = 1e-5;
    for (beam, loads) in assorted_cases() {
        let (_, forces) = solve(&beam, &loads);
        let breakpoints = forces.breakpoints();

        for i in 1..40 {
            let x = beam.length * (i as f64 + 0.37) / 40.0;
            if breakpoints.iter().any(|b| (b - x).abs() < 10.0 * h) || x >= beam.length {
                continue;
            }
            let slope = (forces.moment.evaluate(x + h).unwrap()
                - forces.moment.evaluate(x - h).unwrap())
                / (2.0 * h);
            assert_relative_eq!(
                slope,
                forces.shear.evaluate(x).unwrap(),
                epsilon = 1e-4,
                max_relative = 1e-6
            );
        }
    }
}

#[test]
fn critical_points_are_ordered_and_inside_the_beam() {
    for (beam, loads) in assorted_cases() {
        let (_, forces) = solve(&beam, &loads);
        for function in [&forces.shear, &forces.moment, &forces.axial] {
            let points = function.critical_points();
            assert!(points.windows(2).all(|w| w[0].x <= w[1].x));
            assert!(points.iter().all(|p| (0.0..=beam.length).contains(&p.x)));
        }
    }
}

#[test]
fn evaluation_outside_the_beam_is_invalid_input() {
    let (_, forces) = solve(&Beam::simply_supported(4.0), &[Load::point(1.0, 2.0)]);
    for x in [-0.001, 4.001] {
        let err = forces.shear.evaluate(x).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}

#[test]
fn results_serialize_to_json() {
    let (beam, loads) = overhanging_example();
    let (reactions, forces) = solve(&beam, &loads);

    let json = serde_json::to_string(&forces).unwrap();
    assert!(json.contains("\"pieces\""));
    let roundtrip: InternalForces = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtrip, forces);

    let json = serde_json::to_string(&reactions).unwrap();
    let roundtrip: ReactionSet = serde_json::from_str(&json).unwrap();
    assert_eq!(roundtrip, reactions);
}

#[test]
fn malformed_diagrams_are_rejected_when_deserialized() {
    let (_, forces) = solve(&Beam::simply_supported(4.0), &[Load::point(1.0, 2.0)]);
    let mut value = serde_json::to_value(&forces).unwrap();
    value["moment"]["pieces"] = serde_json::json!([]);

    let result: Result<InternalForces, _> = serde_json::from_value(value);
    assert!(result.is_err());
}

#[test]
fn results_can_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReactionSet>();
    assert_send_sync::<InternalForces>();

    let (beam, loads) = overhanging_example();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let beam = beam.clone();
            let loads = loads.clone();
            std::thread::spawn(move || solve(&beam, &loads).1.summary())
        })
        .collect();
    for handle in handles {
        let summary = handle.join().unwrap();
        assert_relative_eq!(summary.max_moment.value, 2575.0, epsilon = 1e-9);
    }
}
