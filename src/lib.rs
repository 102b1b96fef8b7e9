//! A Mamdani fuzzy inference engine for an overtake / no-overtake decision.
//!
//! A [`FuzzySystem`] is built once, either with the typed builder:
//!
//! ```ignore
//! terms! {
//!     pub enum Lane {
//!         Blocked => "obstruida",
//!         Clear => "livre",
//!     }
//! }
//!
//! let mut builder = SystemBuilder::new();
//! let lane = builder.antecedent(
//!     "pista",
//!     Universe::range(0., 1., 0.1)?,
//!     Terms::new()
//!         .with(Lane::Blocked, Shape::trapezoid(0., 0., 0.3, 0.5)?)
//!         .with(Lane::Clear, Shape::triangle(0.4, 0.7, 1.)?),
//! )?;
//! // ... consequent and rules
//! let system = builder.build()?;
//! let decision = system.infer(&Inputs::new().with(lane, 0.7));
//! ```
//!
//! or from a JSON description through [`SystemConfig`]. Either way every term
//! name is resolved while building, so inference itself can only end in one of
//! the three [`Decision`] outcomes.

mod config;
mod diagnostics;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod outputs;
mod rules;
mod snapshot;
mod terms;
mod variable;

pub mod ops;
pub mod reference;

pub use config::{ExprConfig, RuleConfig, ShapeConfig, SystemConfig, TermConfig, TermRef, UniverseConfig, VariableConfig};
pub use diagnostics::{Series, VariablePlot};
pub use dsl::Expr;
pub use error::{ConfigError, InferenceError, LookupError};
pub use inference::{FuzzySystem, SystemBuilder};
pub use inputs::Inputs;
pub use membership::{Shape, ShapeKind, Universe, MAX_SAMPLES};
pub use outputs::{Decision, Outputs, Verdict, DECISION_THRESHOLD};
pub use rules::{Rule, Rules};
pub use snapshot::SystemHandle;
pub use terms::{Key, Term, Terms};
pub use variable::{LinguisticVariable, Role, TermDef, TermDegree, TermId, Variable, VariableKey, Variables};
