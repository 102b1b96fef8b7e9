use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::{ConfigError, LookupError};
use crate::math::interp;
use crate::membership::{Shape, Universe};

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Position of a term in its variable's declaration order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId(pub(crate) usize);

impl TermId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A typed handle on a variable whose terms are the enum `I`.
pub struct Variable<I>(pub(crate) VariableKey, PhantomData<I>);

impl<I> Variable<I> {
    pub(crate) fn new(key: VariableKey) -> Self {
        Variable(key, PhantomData)
    }

    pub fn key(&self) -> VariableKey {
        self.0
    }
}

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Variable<I> {}

impl<I> fmt::Debug for Variable<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Variable").field(&self.0).finish()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Antecedent,
    Consequent,
}

#[derive(Clone, Debug)]
pub struct TermDef {
    pub(crate) name: String,
    pub(crate) shape: Shape,
    // Shape sampled over the variable's universe
    pub(crate) curve: Vec<f64>,
}

impl TermDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn curve(&self) -> &[f64] {
        &self.curve
    }
}

/// A term and the degree a crisp value has in it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TermDegree<'v> {
    pub term: &'v str,
    pub degree: f64,
}

impl fmt::Display for TermDegree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2})", self.term, self.degree)
    }
}

#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    terms: Vec<TermDef>,
}

impl LinguisticVariable {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        universe: Universe,
        terms: impl IntoIterator<Item = (String, Shape)>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let mut defs: Vec<TermDef> = Vec::new();

        for (term, shape) in terms {
            if defs.iter().any(|def| def.name == term) {
                return Err(ConfigError::DuplicateTerm { variable: name, term });
            }

            let curve = shape.evaluate_over(&universe);

            defs.push(TermDef {
                name: term,
                shape,
                curve,
            });
        }

        if defs.is_empty() {
            return Err(ConfigError::NoTerms(name));
        }

        Ok(Self {
            name,
            role,
            universe,
            terms: defs,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> &[TermDef] {
        &self.terms
    }

    pub fn term(&self, id: TermId) -> &TermDef {
        &self.terms[id.0]
    }

    pub fn term_id(&self, name: &str) -> Result<TermId, LookupError> {
        self.terms
            .iter()
            .position(|def| def.name == name)
            .map(TermId)
            .ok_or_else(|| LookupError::UnknownTerm {
                variable: self.name.clone(),
                term: name.to_owned(),
            })
    }

    pub fn term_degree(&self, id: TermId, x: f64) -> f64 {
        self.terms[id.0].shape.evaluate(x)
    }

    /// Degree read off the sampled curve rather than the exact shape. Inputs
    /// outside the universe take the degree of the nearest end sample.
    pub fn sampled_degree(&self, id: TermId, x: f64) -> f64 {
        let coords = self
            .universe
            .points()
            .iter()
            .copied()
            .zip(self.terms[id.0].curve.iter().copied());

        interp(x, coords).unwrap_or(0.)
    }

    /// The term with the highest degree at `x`. Ties go to the term declared
    /// first.
    pub fn dominant_term(&self, x: f64) -> TermDegree<'_> {
        let mut best = TermDegree {
            term: &self.terms[0].name,
            degree: self.terms[0].shape.evaluate(x),
        };

        for def in &self.terms[1..] {
            let degree = def.shape.evaluate(x);

            if degree > best.degree {
                best = TermDegree {
                    term: &def.name,
                    degree,
                };
            }
        }

        best
    }

    pub fn curve(&self, id: TermId) -> &[f64] {
        &self.terms[id.0].curve
    }
}

/// All variables of a system, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    pub(crate) slots: SlotMap<VariableKey, LinguisticVariable>,
    order: Vec<VariableKey>,
    by_name: HashMap<String, VariableKey>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, var: LinguisticVariable) -> Result<VariableKey, ConfigError> {
        if self.by_name.contains_key(var.name()) {
            return Err(ConfigError::DuplicateVariable(var.name));
        }

        let name = var.name.clone();
        let key = self.slots.insert(var);

        self.order.push(key);
        self.by_name.insert(name, key);

        Ok(key)
    }

    pub fn get(&self, key: VariableKey) -> Option<&LinguisticVariable> {
        self.slots.get(key)
    }

    pub fn key(&self, name: &str) -> Result<VariableKey, LookupError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::UnknownVariable(name.to_owned()))
    }

    pub fn by_name(&self, name: &str) -> Result<&LinguisticVariable, LookupError> {
        let key = self.key(name)?;

        Ok(&self.slots[key])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = VariableKey> + '_ {
        self.order.iter().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &LinguisticVariable)> + '_ {
        self.order.iter().map(|key| (*key, &self.slots[*key]))
    }
}

impl std::ops::Index<VariableKey> for Variables {
    type Output = LinguisticVariable;

    fn index(&self, key: VariableKey) -> &LinguisticVariable {
        &self.slots[key]
    }
}

#[cfg(test)]
fn lane() -> LinguisticVariable {
    LinguisticVariable::new(
        "pista",
        Role::Antecedent,
        Universe::range(0., 1., 0.1).unwrap(),
        [
            ("obstruida".to_owned(), Shape::trapezoid(0., 0., 0.3, 0.5).unwrap()),
            ("livre".to_owned(), Shape::triangle(0.4, 0.7, 1.).unwrap()),
        ],
    )
    .unwrap()
}

#[test]
fn test_term_degree() {
    let var = lane();
    let livre = var.term_id("livre").unwrap();

    assert_eq!(var.term_degree(livre, 0.7), 1.);
    assert_eq!(var.term_degree(livre, 0.1), 0.);
    assert_eq!(var.curve(livre).len(), 11);
    assert_eq!(
        var.term_id("molhada"),
        Err(LookupError::UnknownTerm {
            variable: "pista".to_owned(),
            term: "molhada".to_owned()
        })
    );
}

#[test]
fn test_dominant_term() {
    let var = lane();
    let dominant = var.dominant_term(0.8);

    assert_eq!(dominant.term, "livre");
    assert!((dominant.degree - 2. / 3.).abs() < 1e-12);
    assert_eq!(var.dominant_term(0.2).to_string(), "obstruida (1.00)");
}

#[test]
fn test_dominant_term_tie_goes_to_first_declared() {
    let universe = Universe::range(0., 10., 1.).unwrap();
    let var = LinguisticVariable::new(
        "x",
        Role::Antecedent,
        universe.clone(),
        [
            ("low".to_owned(), Shape::trapezoid(0., 0., 4., 6.).unwrap()),
            ("high".to_owned(), Shape::trapezoid(4., 6., 10., 10.).unwrap()),
        ],
    )
    .unwrap();

    // Both terms sit at 0.5 at x = 5
    assert_eq!(var.dominant_term(5.).term, "low");

    let swapped = LinguisticVariable::new(
        "x",
        Role::Antecedent,
        universe,
        [
            ("high".to_owned(), Shape::trapezoid(4., 6., 10., 10.).unwrap()),
            ("low".to_owned(), Shape::trapezoid(0., 0., 4., 6.).unwrap()),
        ],
    )
    .unwrap();

    assert_eq!(swapped.dominant_term(5.).term, "high");
    // All zero outside the universe: still the first declared term
    assert_eq!(swapped.dominant_term(50.).term, "high");
    assert_eq!(swapped.dominant_term(50.).degree, 0.);
}

#[test]
fn test_sampled_degree() {
    let var = lane();
    let livre = var.term_id("livre").unwrap();

    assert!((var.sampled_degree(livre, 0.55) - 0.5).abs() < 1e-9);
    assert_eq!(var.sampled_degree(livre, 5.), 0.);
    assert_eq!(var.sampled_degree(livre, f64::NAN), 0.);
}

#[test]
fn test_variables_registry() {
    let mut vars = Variables::new();
    let key = vars.insert(lane()).unwrap();

    assert_eq!(vars.key("pista"), Ok(key));
    assert_eq!(vars[key].name(), "pista");
    assert!(matches!(vars.insert(lane()), Err(ConfigError::DuplicateVariable(name)) if name == "pista"));
    assert_eq!(
        vars.key("lombada"),
        Err(LookupError::UnknownVariable("lombada".to_owned()))
    );
}

#[test]
fn test_duplicate_and_empty_terms() {
    let universe = Universe::range(0., 1., 0.5).unwrap();
    let shape = Shape::triangle(0., 0.5, 1.).unwrap();

    assert!(matches!(
        LinguisticVariable::new(
            "v",
            Role::Antecedent,
            universe.clone(),
            [("a".to_owned(), shape), ("a".to_owned(), shape)]
        ),
        Err(ConfigError::DuplicateTerm { .. })
    ));
    assert!(matches!(
        LinguisticVariable::new("v", Role::Antecedent, universe, Vec::new()),
        Err(ConfigError::NoTerms(_))
    ));
}
