//! The overtaking decision system: eight road-condition antecedents and one
//! `ultrapassagem` consequent.

use crate::error::{ConfigError, LookupError};
use crate::inference::{FuzzySystem, SystemBuilder};
use crate::inputs::Inputs;
use crate::membership::{Shape, Universe};
use crate::terms::Terms;

pub const DISTANCE: &str = "distancia";
pub const PERMISSION: &str = "permissao";
pub const LANE: &str = "pista";
pub const SPEED: &str = "velocidade";
pub const VISIBILITY: &str = "visibilidade";
pub const BUMP: &str = "lombada";
pub const CROSSING: &str = "cruzamento";
pub const LEVEL_CROSSING: &str = "passagem_nivel";
pub const OVERTAKE: &str = "ultrapassagem";

crate::terms! {
    /// Distance to the oncoming vehicle, in meters.
    pub enum Distance {
        VeryShort => "muito_curta",
        Adequate => "adequada",
        VeryLong => "muito_longa",
    }
}

crate::terms! {
    /// Whether road markings allow overtaking.
    pub enum Permission {
        Forbidden => "proibido",
        Permitted => "permitido",
    }
}

crate::terms! {
    pub enum Lane {
        Blocked => "obstruida",
        Clear => "livre",
    }
}

crate::terms! {
    /// Own speed, in km/h.
    pub enum Speed {
        Low => "baixa",
        Adequate => "adequada",
        High => "alta",
    }
}

crate::terms! {
    pub enum Visibility {
        Poor => "ruim",
        Good => "boa",
    }
}

crate::terms! {
    /// Presence of a road feature: speed bump, crossing or level crossing.
    pub enum Hazard {
        Present => "presente",
        Absent => "ausente",
    }
}

crate::terms! {
    pub enum Overtake {
        No => "nao",
        Yes => "sim",
    }
}

fn unit() -> Result<Universe, ConfigError> {
    Universe::range(0., 1., 0.1)
}

fn hazard(present_from: f64, present_full: f64) -> Result<Terms<Hazard>, ConfigError> {
    Ok(Terms::new()
        .with(Hazard::Present, Shape::trapezoid(present_from, present_full, 1., 1.)?)
        .with(Hazard::Absent, Shape::trapezoid(0., 0., present_from, present_full)?))
}

/// Builds the overtaking system with its four rules:
///
/// 1. every condition favorable → `sim`
/// 2. any condition unfavorable → `nao`
/// 3. high speed → `sim`
/// 4. very short distance and clear lane → `sim`
pub fn overtaking_system() -> Result<FuzzySystem, ConfigError> {
    let mut builder = SystemBuilder::new();

    let distance = builder.antecedent(
        DISTANCE,
        Universe::range(0., 500., 1.)?,
        Terms::new()
            .with(Distance::VeryShort, Shape::trapezoid(0., 0., 100., 200.)?)
            .with(Distance::Adequate, Shape::triangle(150., 250., 350.)?)
            .with(Distance::VeryLong, Shape::trapezoid(300., 400., 500., 500.)?),
    )?;
    let permission = builder.antecedent(
        PERMISSION,
        unit()?,
        Terms::new()
            .with(Permission::Forbidden, Shape::trapezoid(0., 0., 0.2, 0.4)?)
            .with(Permission::Permitted, Shape::triangle(0.3, 0.6, 1.)?),
    )?;
    let lane = builder.antecedent(
        LANE,
        unit()?,
        Terms::new()
            .with(Lane::Blocked, Shape::trapezoid(0., 0., 0.3, 0.5)?)
            .with(Lane::Clear, Shape::triangle(0.4, 0.7, 1.)?),
    )?;
    let speed = builder.antecedent(
        SPEED,
        Universe::range(0., 100., 1.)?,
        Terms::new()
            .with(Speed::Low, Shape::trapezoid(0., 0., 30., 50.)?)
            .with(Speed::Adequate, Shape::triangle(40., 60., 80.)?)
            .with(Speed::High, Shape::trapezoid(70., 90., 100., 100.)?),
    )?;
    let visibility = builder.antecedent(
        VISIBILITY,
        unit()?,
        Terms::new()
            .with(Visibility::Poor, Shape::trapezoid(0., 0., 0.2, 0.5)?)
            .with(Visibility::Good, Shape::triangle(0.4, 0.7, 1.)?),
    )?;
    let bump = builder.antecedent(BUMP, unit()?, hazard(0.5, 0.6)?)?;
    let crossing = builder.antecedent(CROSSING, unit()?, hazard(0.4, 0.5)?)?;
    let level_crossing = builder.antecedent(LEVEL_CROSSING, unit()?, hazard(0.7, 0.8)?)?;
    let overtake = builder.consequent(
        OVERTAKE,
        unit()?,
        Terms::new()
            .with(Overtake::No, Shape::trapezoid(0., 0., 0.2, 0.5)?)
            .with(Overtake::Yes, Shape::triangle(0.4, 0.7, 1.)?),
    )?;

    builder
        .labeled_rule(
            "favorable conditions",
            distance
                .is(Distance::Adequate)
                .and(permission.is(Permission::Permitted))
                .and(lane.is(Lane::Clear))
                .and(speed.is(Speed::Adequate))
                .and(visibility.is(Visibility::Good))
                .and(bump.is(Hazard::Absent))
                .and(crossing.is(Hazard::Absent))
                .and(level_crossing.is(Hazard::Absent)),
            overtake.is(Overtake::Yes),
        )
        .labeled_rule(
            "unfavorable condition",
            distance
                .is(Distance::VeryLong)
                .or(speed.is(Speed::Low))
                .or(permission.is(Permission::Forbidden))
                .or(lane.is(Lane::Blocked))
                .or(visibility.is(Visibility::Poor))
                .or(bump.is(Hazard::Present))
                .or(crossing.is(Hazard::Present))
                .or(level_crossing.is(Hazard::Present)),
            overtake.is(Overtake::No),
        )
        .labeled_rule("high speed", speed.is(Speed::High), overtake.is(Overtake::Yes))
        .labeled_rule(
            "short distance on a clear lane",
            distance.is(Distance::VeryShort).and(lane.is(Lane::Clear)),
            overtake.is(Overtake::Yes),
        );

    builder.build()
}

/// One complete set of readings for the overtaking system.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OvertakingInputs {
    pub distance: f64,
    pub permission: f64,
    pub lane: f64,
    pub speed: f64,
    pub visibility: f64,
    pub bump: f64,
    pub crossing: f64,
    pub level_crossing: f64,
}

impl OvertakingInputs {
    pub fn named(&self) -> [(&'static str, f64); 8] {
        [
            (DISTANCE, self.distance),
            (PERMISSION, self.permission),
            (LANE, self.lane),
            (SPEED, self.speed),
            (VISIBILITY, self.visibility),
            (BUMP, self.bump),
            (CROSSING, self.crossing),
            (LEVEL_CROSSING, self.level_crossing),
        ]
    }

    /// Resolves the readings against `system`, which must declare every
    /// overtaking variable.
    pub fn to_inputs(&self, system: &FuzzySystem) -> Result<Inputs, LookupError> {
        let mut inputs = Inputs::with_capacity(8);

        for (name, value) in self.named() {
            inputs.insert(system.key(name)?, value);
        }

        Ok(inputs)
    }
}

#[cfg(test)]
use crate::outputs::Decision;

#[test]
fn test_builds() {
    let system = overtaking_system().unwrap();

    assert_eq!(system.variables().len(), 9);
    assert_eq!(system.rules().len(), 4);
    assert_eq!(system.output().name(), OVERTAKE);
    assert_eq!(system.required_inputs().count(), 8);
    assert_eq!(system.output().universe().len(), 11);
    assert_eq!(system.variables().by_name(DISTANCE).unwrap().universe().len(), 501);
}

#[test]
fn test_hazard_terms_meet() {
    let system = overtaking_system().unwrap();
    let bump = system.variables().by_name(BUMP).unwrap();
    let present = bump.term_id("presente").unwrap();
    let absent = bump.term_id("ausente").unwrap();

    let total = bump.term_degree(present, 0.55) + bump.term_degree(absent, 0.55);

    assert!((total - 1.).abs() < 1e-12);
}

#[test]
fn test_to_inputs() {
    let system = overtaking_system().unwrap();
    let readings = OvertakingInputs {
        distance: 250.,
        permission: 0.6,
        lane: 0.7,
        speed: 60.,
        visibility: 0.7,
        ..Default::default()
    };
    let inputs = readings.to_inputs(&system).unwrap();

    assert_eq!(inputs.len(), 8);
    assert!(matches!(system.infer(&inputs), Decision::Decided(v) if (v - 0.7).abs() < 1e-9));
}
