use std::collections::HashMap;

use fuzzy_overtake::reference::{self, OvertakingInputs};
use fuzzy_overtake::{Decision, FuzzySystem, Inputs, SystemHandle, Verdict};

const FIXTURE: &str = include_str!("fixtures/overtaking.json");

fn favorable() -> OvertakingInputs {
    OvertakingInputs {
        distance: 250.,
        permission: 0.6,
        lane: 0.7,
        speed: 60.,
        visibility: 0.7,
        bump: 0.,
        crossing: 0.,
        level_crossing: 0.,
    }
}

fn system() -> FuzzySystem {
    reference::overtaking_system().unwrap()
}

#[test]
fn test_favorable_conditions_permit() {
    let system = system();
    let inputs = favorable().to_inputs(&system).unwrap();
    let outputs = system.evaluate(&inputs).unwrap();

    assert_eq!(outputs.strengths(), &[1., 0., 0., 0.]);
    assert!((outputs.value() - 0.7).abs() < 1e-9);
    assert_eq!(system.infer(&inputs).verdict(), Some(Verdict::Permitted));
}

#[test]
fn test_conflicting_rules_mix_by_max() {
    let system = system();
    let readings = OvertakingInputs {
        distance: 450.,
        permission: 0.1,
        lane: 0.1,
        speed: 95.,
        visibility: 0.1,
        bump: 1.,
        crossing: 0.,
        level_crossing: 0.,
    };
    let outputs = system.evaluate(&readings.to_inputs(&system).unwrap()).unwrap();
    let aggregated = outputs.aggregated();

    assert_eq!(outputs.strengths(), &[0., 1., 1., 0.]);
    // nao holds the low end, sim peaks at 0.7
    assert_eq!(aggregated[0], 1.);
    assert!((aggregated[7] - 1.).abs() < 1e-9);
    assert!((outputs.value() - 0.390_476_190_476_190_5).abs() < 1e-9);
    assert_eq!(
        system.infer(&readings.to_inputs(&system).unwrap()).verdict(),
        Some(Verdict::NotPermitted)
    );
}

#[test]
fn test_short_distance_on_clear_lane() {
    let system = system();
    let readings = OvertakingInputs {
        distance: 50.,
        lane: 0.9,
        ..favorable()
    };
    let outputs = system.evaluate(&readings.to_inputs(&system).unwrap()).unwrap();

    // livre at 0.9 is 1/3
    assert!((outputs.strengths()[3] - 1. / 3.).abs() < 1e-12);
    assert_eq!(&outputs.strengths()[..3], &[0., 0., 0.]);
    assert!((outputs.value() - 0.7).abs() < 1e-9);
    assert!(outputs.aggregated().iter().all(|m| *m <= outputs.strengths()[3]));
}

#[test]
fn test_outside_every_support_fires_nothing() {
    let system = system();
    let readings = OvertakingInputs {
        distance: 600.,
        permission: -1.,
        lane: -1.,
        speed: -10.,
        visibility: -1.,
        bump: -1.,
        crossing: -1.,
        level_crossing: -1.,
    };
    let inputs = readings.to_inputs(&system).unwrap();

    assert_eq!(system.infer(&inputs), Decision::NoRuleFired);
    assert_eq!(system.infer(&inputs).verdict(), None);
}

#[test]
fn test_missing_input_is_reported_by_name() {
    let system = system();
    let mut inputs = favorable().to_inputs(&system).unwrap();

    inputs.remove(system.key(reference::VISIBILITY).unwrap());

    assert_eq!(system.infer(&inputs), Decision::MissingInput("visibilidade".to_owned()));
}

#[test]
fn test_first_missing_input_in_declaration_order() {
    let system = system();

    assert_eq!(system.infer(&Inputs::new()), Decision::MissingInput("distancia".to_owned()));
}

#[test]
fn test_repeated_inference_is_identical() {
    let system = system();
    let inputs = favorable().to_inputs(&system).unwrap();

    assert_eq!(system.evaluate(&inputs), system.evaluate(&inputs));
}

#[test]
fn test_named_inputs() {
    let system = system();
    let mut named: HashMap<String, f64> = favorable()
        .named()
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();

    named.insert("chuva".to_owned(), 1.);

    assert!(system.infer_named(&named).is_permitted());

    named.remove(reference::LANE);

    assert_eq!(system.infer_named(&named), Decision::MissingInput("pista".to_owned()));
}

#[test]
fn test_batch_keeps_request_order() {
    let system = system();
    let batch: Vec<Inputs> = [
        favorable(),
        OvertakingInputs {
            lane: 0.1,
            ..favorable()
        },
        OvertakingInputs {
            distance: 600.,
            permission: -1.,
            lane: -1.,
            speed: -10.,
            visibility: -1.,
            bump: -1.,
            crossing: -1.,
            level_crossing: -1.,
        },
    ]
    .iter()
    .map(|readings| readings.to_inputs(&system).unwrap())
    .collect();

    let decisions = system.infer_batch(&batch);
    let expected: Vec<Decision> = batch.iter().map(|inputs| system.infer(inputs)).collect();

    assert_eq!(decisions, expected);
    assert!(decisions[0].is_permitted());
    assert_eq!(decisions[1].verdict(), Some(Verdict::NotPermitted));
    assert_eq!(decisions[2], Decision::NoRuleFired);
}

#[test]
fn test_fixture_matches_typed_system() {
    let typed = system();
    let loaded = FuzzySystem::from_json(FIXTURE).unwrap();

    assert_eq!(loaded.rules()[3].label(), Some("short distance on a clear lane"));

    for readings in [
        favorable(),
        OvertakingInputs {
            distance: 450.,
            speed: 95.,
            bump: 1.,
            ..favorable()
        },
        OvertakingInputs {
            distance: 175.,
            lane: 0.8,
            speed: 45.,
            ..favorable()
        },
    ] {
        let a = typed.evaluate(&readings.to_inputs(&typed).unwrap()).unwrap();
        let b = loaded.evaluate(&readings.to_inputs(&loaded).unwrap()).unwrap();

        assert_eq!(a, b);
    }
}

#[test]
fn test_dominant_term() {
    let system = system();
    let lane = system.dominant_term(reference::LANE, 0.45).unwrap();

    assert_eq!(lane.term, "obstruida");
    assert_eq!(lane.to_string(), "obstruida (0.25)");

    // Exact ties go to the term declared first
    assert_eq!(system.dominant_term(reference::DISTANCE, 175.).unwrap().term, "muito_curta");
    assert_eq!(system.dominant_term(reference::SPEED, 45.).unwrap().term, "baixa");

    assert!(system.dominant_term("chuva", 1.).is_err());
}

#[test]
fn test_fuzzify_and_curve() {
    let system = system();
    let degrees = system.fuzzify(reference::SPEED, 75.).unwrap();
    let labels: Vec<String> = degrees.iter().map(ToString::to_string).collect();

    assert_eq!(labels, ["baixa (0.00)", "adequada (0.25)", "alta (0.25)"]);

    let curve = system.curve(reference::DISTANCE, "adequada").unwrap();

    assert_eq!(curve.len(), 501);
    assert_eq!(curve[250], (250., 1.));
    assert_eq!(curve[150], (150., 0.));
    assert!(system.curve(reference::DISTANCE, "longa").is_err());
}

#[test]
fn test_plots() {
    let system = system();
    let plot = system.plot(reference::LANE, Some(0.7)).unwrap();

    assert_eq!(plot.universe.len(), 11);
    assert_eq!(plot.marker, Some(0.7));
    assert_eq!(
        plot.series.iter().map(|s| s.term.as_str()).collect::<Vec<_>>(),
        ["obstruida", "livre"]
    );

    let outputs = system.evaluate(&favorable().to_inputs(&system).unwrap()).unwrap();
    let plot = system.output_plot(&outputs);

    assert_eq!(plot.variable, "ultrapassagem");
    assert_eq!(plot.series.len(), 3);
    assert_eq!(plot.series[2].term, "aggregated");
    assert_eq!(plot.series[2].degrees, outputs.aggregated());
    assert_eq!(plot.marker, Some(outputs.value()));
}

#[test]
fn test_snapshot_survives_publish() {
    let handle = SystemHandle::new(system());
    let before = handle.snapshot();
    let named: HashMap<String, f64> = favorable()
        .named()
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();

    assert!(handle.infer_named(&named).is_permitted());

    // Same variables, but the favorable rule now concludes `nao`
    let flipped = FIXTURE.replacen(
        r#""variable": "ultrapassagem",
        "term": "sim""#,
        r#""variable": "ultrapassagem",
        "term": "nao""#,
        1,
    );
    let previous = handle.publish(FuzzySystem::from_json(&flipped).unwrap());

    assert!(std::sync::Arc::ptr_eq(&before, &previous));
    assert!(before.infer_named(&named).is_permitted());
    assert_eq!(handle.infer_named(&named).verdict(), Some(Verdict::NotPermitted));
}
