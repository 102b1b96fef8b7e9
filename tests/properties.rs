//! Property-based tests for membership shapes and the inference pipeline

use fuzzy_overtake::reference::{self, OvertakingInputs};
use fuzzy_overtake::{ops, FuzzySystem, Shape, SystemConfig};
use proptest::prelude::*;

const FIXTURE: &str = include_str!("fixtures/overtaking.json");

/// Four sorted finite breakpoints
fn breakpoints_strategy() -> impl Strategy<Value = [f64; 4]> {
    prop::array::uniform4(-1_000.0..1_000.0f64).prop_map(|mut points| {
        points.sort_by(f64::total_cmp);
        points
    })
}

/// Breakpoints with ramps at least `0.1` wide
fn sloped_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-100.0..100.0f64, 0.1..10.0f64, 0.0..10.0f64, 0.1..10.0f64)
        .prop_map(|(a, rise, top, fall)| (a, a + rise, a + rise + top, a + rise + top + fall))
}

/// Readings that stay inside each variable's universe
fn readings_strategy() -> impl Strategy<Value = OvertakingInputs> {
    (
        (0.0..=500.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=100.0f64),
        (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64),
    )
        .prop_map(
            |((distance, permission, lane, speed), (visibility, bump, crossing, level_crossing))| {
                OvertakingInputs {
                    distance,
                    permission,
                    lane,
                    speed,
                    visibility,
                    bump,
                    crossing,
                    level_crossing,
                }
            },
        )
}

fn centroid(system: &FuzzySystem, strengths: &[f64]) -> Option<f64> {
    ops::centroid(system.output().universe().points(), &system.aggregate(strengths))
}

proptest! {
    #[test]
    fn membership_stays_in_unit_interval(points in breakpoints_strategy(), x in prop::num::f64::ANY) {
        let [a, b, c, d] = points;
        let shape = Shape::trapezoid(a, b, c, d).unwrap();
        let degree = shape.evaluate(x);

        prop_assert!((0.0..=1.0).contains(&degree));
    }

    #[test]
    fn trapezoid_breakpoints_hit_zero_and_one((a, b, c, d) in sloped_strategy()) {
        let shape = Shape::trapezoid(a, b, c, d).unwrap();

        prop_assert_eq!(shape.evaluate(a), 0.);
        prop_assert_eq!(shape.evaluate(b), 1.);
        prop_assert_eq!(shape.evaluate(c), 1.);
        prop_assert_eq!(shape.evaluate(d), 0.);
    }

    #[test]
    fn sloped_trapezoid_is_continuous((a, b, c, d) in sloped_strategy(), x in -120.0..140.0f64, dx in 0.0..0.01f64) {
        let shape = Shape::trapezoid(a, b, c, d).unwrap();
        let max_slope = f64::max(1. / (b - a), 1. / (d - c));
        let jump = (shape.evaluate(x + dx) - shape.evaluate(x)).abs();

        prop_assert!(jump <= dx * max_slope + 1e-9);
    }

    #[test]
    fn aggregation_is_monotone(
        low in prop::array::uniform4(0.0..=1.0f64),
        extra in prop::array::uniform4(0.0..=1.0f64),
    ) {
        let system = reference::overtaking_system().unwrap();
        let high: Vec<f64> = low.iter().zip(extra).map(|(l, e)| f64::min(1., l + e)).collect();

        let before = system.aggregate(&low);
        let after = system.aggregate(&high);

        prop_assert!(before.iter().zip(&after).all(|(b, a)| b <= a));
    }

    #[test]
    fn stronger_overtake_rules_never_lower_output(
        strengths in prop::array::uniform4(0.0..=1.0f64),
        boost in prop::array::uniform3(0.0..=1.0f64),
    ) {
        let system = reference::overtaking_system().unwrap();
        let mut boosted = strengths;

        // Rules 1, 3 and 4 conclude `sim`
        for (i, extra) in [0, 2, 3].into_iter().zip(boost) {
            boosted[i] = f64::min(1., boosted[i] + extra);
        }

        if let Some(before) = centroid(&system, &strengths) {
            let after = centroid(&system, &boosted).unwrap();

            prop_assert!(after >= before - 1e-12, "{after} < {before}");
        }
    }

    #[test]
    fn repeated_inference_is_bit_identical(readings in readings_strategy()) {
        let system = reference::overtaking_system().unwrap();
        let inputs = readings.to_inputs(&system).unwrap();

        prop_assert_eq!(system.evaluate(&inputs), system.evaluate(&inputs));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rule_order_does_not_change_result(
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
        readings in readings_strategy(),
    ) {
        let config = SystemConfig::from_json(FIXTURE).unwrap();
        let mut shuffled = config.clone();

        shuffled.rules = order.iter().map(|i| config.rules[*i].clone()).collect();

        let system = config.build().unwrap();
        let permuted = shuffled.build().unwrap();
        let expected = system.evaluate(&readings.to_inputs(&system).unwrap());
        let actual = permuted.evaluate(&readings.to_inputs(&permuted).unwrap());

        match (expected, actual) {
            (Ok(expected), Ok(actual)) => {
                prop_assert_eq!(expected.value().to_bits(), actual.value().to_bits());
                prop_assert_eq!(expected.aggregated(), actual.aggregated());
            },
            (expected, actual) => {
                prop_assert_eq!(expected, actual);
            },
        }
    }
}
