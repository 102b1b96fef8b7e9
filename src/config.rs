//! Declarative system description, loadable from JSON.
//!
//! ```json
//! {
//!   "variables": [
//!     {
//!       "name": "pista",
//!       "role": "antecedent",
//!       "universe": { "min": 0.0, "max": 1.0, "step": 0.1 },
//!       "terms": [
//!         { "name": "obstruida", "shape": { "trapezoid": [0.0, 0.0, 0.3, 0.5] } },
//!         { "name": "livre", "shape": { "triangle": [0.4, 0.7, 1.0] } }
//!       ]
//!     }
//!   ],
//!   "rules": [
//!     {
//!       "when": { "is": { "variable": "pista", "term": "livre" } },
//!       "then": { "variable": "ultrapassagem", "term": "sim" }
//!     }
//!   ]
//! }
//! ```
//!
//! `and`/`or` take a list of operands and fold left into binary nodes.

use serde::{Deserialize, Serialize};

use crate::dsl::Expr;
use crate::error::ConfigError;
use crate::inference::{FuzzySystem, SystemBuilder};
use crate::membership::{Shape, Universe};
use crate::variable::Role;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SystemConfig {
    pub variables: Vec<VariableConfig>,
    pub rules: Vec<RuleConfig>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct VariableConfig {
    pub name: String,
    pub role: Role,
    pub universe: UniverseConfig,
    pub terms: Vec<TermConfig>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct UniverseConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TermConfig {
    pub name: String,
    pub shape: ShapeConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeConfig {
    Trapezoid([f64; 4]),
    Triangle([f64; 3]),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TermRef {
    pub variable: String,
    pub term: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprConfig {
    Is(TermRef),
    And(Vec<ExprConfig>),
    Or(Vec<ExprConfig>),
    Not(Box<ExprConfig>),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub when: ExprConfig,
    pub then: TermRef,
}

impl ShapeConfig {
    pub fn to_shape(self) -> Result<Shape, ConfigError> {
        match self {
            ShapeConfig::Trapezoid([a, b, c, d]) => Shape::trapezoid(a, b, c, d),
            ShapeConfig::Triangle([a, b, c]) => Shape::triangle(a, b, c),
        }
    }
}

impl ExprConfig {
    fn lower(&self, builder: &SystemBuilder) -> Result<Expr, ConfigError> {
        match self {
            ExprConfig::Is(term) => Ok(builder.term(&term.variable, &term.term)?),
            ExprConfig::And(exprs) => {
                let lowered = exprs.iter().map(|expr| expr.lower(builder)).collect::<Result<Vec<_>, _>>()?;

                Expr::all(lowered).ok_or(ConfigError::EmptyConnective)
            },
            ExprConfig::Or(exprs) => {
                let lowered = exprs.iter().map(|expr| expr.lower(builder)).collect::<Result<Vec<_>, _>>()?;

                Expr::any(lowered).ok_or(ConfigError::EmptyConnective)
            },
            ExprConfig::Not(expr) => Ok(expr.lower(builder)?.not()),
        }
    }
}

impl SystemConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build(&self) -> Result<FuzzySystem, ConfigError> {
        let mut builder = SystemBuilder::new();

        for var in &self.variables {
            let UniverseConfig { min, max, step } = var.universe;
            let terms = var
                .terms
                .iter()
                .map(|term| -> Result<(String, Shape), ConfigError> {
                    Ok((term.name.clone(), term.shape.to_shape()?))
                })
                .collect::<Result<Vec<_>, _>>()?;

            builder.variable(&var.name, var.role, Universe::range(min, max, step)?, terms)?;
        }

        for rule in &self.rules {
            let premise = rule.when.lower(&builder)?;
            let consequence = builder.term(&rule.then.variable, &rule.then.term)?;

            match &rule.label {
                Some(label) => builder.labeled_rule(label.clone(), premise, consequence),
                None => builder.rule(premise, consequence),
            };
        }

        builder.build()
    }
}

impl FuzzySystem {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        SystemConfig::from_json(text)?.build()
    }
}

#[cfg(test)]
use crate::outputs::Decision;

#[cfg(test)]
const LANE_ONLY: &str = r#"{
    "variables": [
        {
            "name": "pista",
            "role": "antecedent",
            "universe": { "min": 0.0, "max": 1.0, "step": 0.1 },
            "terms": [
                { "name": "obstruida", "shape": { "trapezoid": [0.0, 0.0, 0.3, 0.5] } },
                { "name": "livre", "shape": { "triangle": [0.4, 0.7, 1.0] } }
            ]
        },
        {
            "name": "ultrapassagem",
            "role": "consequent",
            "universe": { "min": 0.0, "max": 1.0, "step": 0.1 },
            "terms": [
                { "name": "nao", "shape": { "trapezoid": [0.0, 0.0, 0.2, 0.5] } },
                { "name": "sim", "shape": { "triangle": [0.4, 0.7, 1.0] } }
            ]
        }
    ],
    "rules": [
        {
            "label": "clear lane",
            "when": { "is": { "variable": "pista", "term": "livre" } },
            "then": { "variable": "ultrapassagem", "term": "sim" }
        },
        {
            "when": { "not": { "is": { "variable": "pista", "term": "livre" } } },
            "then": { "variable": "ultrapassagem", "term": "nao" }
        }
    ]
}"#;

#[test]
fn test_load_and_infer() {
    let system = FuzzySystem::from_json(LANE_ONLY).unwrap();
    let inputs = system.inputs_from_named([("pista", 0.7)]);

    assert_eq!(system.rules()[0].label(), Some("clear lane"));
    assert!(system.infer(&inputs).is_permitted());

    let inputs = system.inputs_from_named([("pista", 0.1)]);

    assert!(!system.infer(&inputs).is_permitted());
    assert!(matches!(system.infer(&inputs), Decision::Decided(_)));
}

#[test]
fn test_round_trip_preserves_config() {
    let config = SystemConfig::from_json(LANE_ONLY).unwrap();
    let again = SystemConfig::from_json(&config.to_json().unwrap()).unwrap();

    assert_eq!(config, again);
}

#[test]
fn test_bad_shape_fails_at_build() {
    let text = LANE_ONLY.replacen("[0.4, 0.7, 1.0]", "[0.8, 0.7, 1.0]", 1);

    assert!(matches!(
        FuzzySystem::from_json(&text),
        Err(ConfigError::InvalidShapeParameters { .. })
    ));
}

#[test]
fn test_unknown_names_fail_at_build() {
    let text = LANE_ONLY.replace(r#""term": "livre" } },"#, r#""term": "molhada" } },"#);

    assert!(matches!(FuzzySystem::from_json(&text), Err(ConfigError::Lookup(_))));
}

#[test]
fn test_empty_connective() {
    let text = LANE_ONLY.replace(
        r#""when": { "is": { "variable": "pista", "term": "livre" } },"#,
        r#""when": { "and": [] },"#,
    );

    assert!(matches!(FuzzySystem::from_json(&text), Err(ConfigError::EmptyConnective)));
}

#[test]
fn test_oversized_universe_fails_at_build() {
    let text = LANE_ONLY.replacen(r#""step": 0.1"#, r#""step": 1e-300"#, 1);

    assert!(matches!(
        FuzzySystem::from_json(&text),
        Err(ConfigError::InvalidUniverseStep { .. })
    ));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(FuzzySystem::from_json("{ \"variables\": 3 }"), Err(ConfigError::Parse(_))));
}
