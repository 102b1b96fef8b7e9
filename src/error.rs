use thiserror::Error;

/// Failure to resolve a variable or term by name.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("variable `{variable}` has no term `{term}`")]
    UnknownTerm { variable: String, term: String },
}

/// Errors raised while building a fuzzy system. None of these can happen
/// once a `FuzzySystem` exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid shape parameters ({a}, {b}, {c}, {d}): expected finite a <= b <= c <= d")]
    InvalidShapeParameters { a: f64, b: f64, c: f64, d: f64 },
    #[error("universe has no sample points")]
    EmptyUniverse,
    #[error("universe step {step} over [{min}, {max}] is not usable")]
    InvalidUniverseStep { min: f64, max: f64, step: f64 },
    #[error("universe samples must be finite and strictly increasing (at index {index})")]
    NonIncreasingUniverse { index: usize },
    #[error("variable `{0}` is declared more than once")]
    DuplicateVariable(String),
    #[error("variable `{variable}` declares term `{term}` more than once")]
    DuplicateTerm { variable: String, term: String },
    #[error("variable `{0}` declares no terms")]
    NoTerms(String),
    #[error("variable `{variable}` has no shape for term `{term}`")]
    MissingTermShape { variable: String, term: String },
    #[error("rule {rule} must conclude a single term of the consequent variable")]
    InvalidConsequent { rule: usize },
    #[error("rule {rule} uses consequent variable `{variable}` in its antecedent")]
    AntecedentRole { rule: usize, variable: String },
    #[error("expected exactly one consequent variable, found {0}")]
    ConsequentCount(usize),
    #[error("`and`/`or` needs at least one operand")]
    EmptyConnective,
    #[error("rule base is empty")]
    NoRules,
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Request-time failures. Both are ordinary outcomes and are folded into
/// [`Decision`](crate::Decision) by `FuzzySystem::infer`.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("no input value for variable `{0}`")]
    MissingInput(String),
    #[error("no rule fired: aggregated membership is zero everywhere")]
    NoRuleFired,
}
