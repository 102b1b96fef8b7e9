use std::fmt;

use crate::error::InferenceError;

/// Decided values at or above this are classified as permitted.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Everything computed for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs {
    value: f64,
    aggregated: Vec<f64>,
    strengths: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(value: f64, aggregated: Vec<f64>, strengths: Vec<f64>) -> Self {
        Self {
            value,
            aggregated,
            strengths,
        }
    }

    /// Defuzzified crisp output.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Aggregated membership over the consequent universe.
    pub fn aggregated(&self) -> &[f64] {
        &self.aggregated
    }

    /// Firing strength of each rule, in rule order.
    pub fn strengths(&self) -> &[f64] {
        &self.strengths
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Permitted,
    NotPermitted,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Permitted => f.write_str("overtaking permitted"),
            Verdict::NotPermitted => f.write_str("overtaking not permitted"),
        }
    }
}

/// Outcome of a decision request.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    Decided(f64),
    MissingInput(String),
    NoRuleFired,
}

impl Decision {
    pub fn value(&self) -> Option<f64> {
        match self {
            Decision::Decided(value) => Some(*value),
            _ => None,
        }
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict_at(DECISION_THRESHOLD)
    }

    pub fn verdict_at(&self, threshold: f64) -> Option<Verdict> {
        self.value().map(|value| {
            if value >= threshold {
                Verdict::Permitted
            } else {
                Verdict::NotPermitted
            }
        })
    }

    pub fn is_permitted(&self) -> bool {
        self.verdict() == Some(Verdict::Permitted)
    }
}

impl From<Result<Outputs, InferenceError>> for Decision {
    fn from(result: Result<Outputs, InferenceError>) -> Self {
        match result {
            Ok(outputs) => Decision::Decided(outputs.value),
            Err(InferenceError::MissingInput(name)) => Decision::MissingInput(name),
            Err(InferenceError::NoRuleFired) => Decision::NoRuleFired,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Decided(value) => write!(f, "{value:.2}"),
            Decision::MissingInput(name) => write!(f, "missing input `{name}`"),
            Decision::NoRuleFired => f.write_str("no rule fired"),
        }
    }
}

#[test]
fn test_verdict_threshold() {
    assert_eq!(Decision::Decided(0.5).verdict(), Some(Verdict::Permitted));
    assert_eq!(Decision::Decided(0.49).verdict(), Some(Verdict::NotPermitted));
    assert_eq!(Decision::NoRuleFired.verdict(), None);
    assert!(!Decision::MissingInput("pista".to_owned()).is_permitted());
    assert_eq!(Decision::Decided(0.7).verdict_at(0.8), Some(Verdict::NotPermitted));
}

#[test]
fn test_decision_from_result() {
    let outputs = Outputs::new(0.7, vec![0., 1.], vec![1.]);

    assert_eq!(Decision::from(Ok(outputs)), Decision::Decided(0.7));
    assert_eq!(
        Decision::from(Err(InferenceError::MissingInput("pista".to_owned()))),
        Decision::MissingInput("pista".to_owned())
    );
    assert_eq!(Decision::from(Err(InferenceError::NoRuleFired)), Decision::NoRuleFired);
    assert_eq!(Decision::Decided(0.7049).to_string(), "0.70");
}
