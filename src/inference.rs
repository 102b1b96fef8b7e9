use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::dsl::Expr;
use crate::error::{ConfigError, InferenceError, LookupError};
use crate::inputs::Inputs;
use crate::membership::{Shape, Universe};
use crate::ops;
use crate::outputs::{Decision, Outputs};
use crate::rules::{Rule, Rules};
use crate::terms::{Term, Terms};
use crate::variable::{LinguisticVariable, Role, TermId, Variable, VariableKey, Variables};

/// Collects variables and rules, then validates them into a [`FuzzySystem`].
#[derive(Default)]
pub struct SystemBuilder {
    variables: Variables,
    rules: Rules,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn antecedent<K: Term>(
        &mut self,
        name: &str,
        universe: Universe,
        terms: Terms<K>,
    ) -> Result<Variable<K>, ConfigError> {
        self.typed(name, Role::Antecedent, universe, terms)
    }

    pub fn consequent<K: Term>(
        &mut self,
        name: &str,
        universe: Universe,
        terms: Terms<K>,
    ) -> Result<Variable<K>, ConfigError> {
        self.typed(name, Role::Consequent, universe, terms)
    }

    fn typed<K: Term>(
        &mut self,
        name: &str,
        role: Role,
        universe: Universe,
        terms: Terms<K>,
    ) -> Result<Variable<K>, ConfigError> {
        let mut named = Vec::with_capacity(K::ALL.len());

        // Walk K::ALL so term ids line up with Term::index
        for term in K::ALL {
            let shape = terms.get(*term).ok_or_else(|| ConfigError::MissingTermShape {
                variable: name.to_owned(),
                term: term.label().to_owned(),
            })?;

            named.push((term.label().to_owned(), *shape));
        }

        let key = self.variable(name, role, universe, named)?;

        Ok(Variable::new(key))
    }

    /// Adds a variable whose terms are only known by name.
    pub fn variable(
        &mut self,
        name: &str,
        role: Role,
        universe: Universe,
        terms: Vec<(String, Shape)>,
    ) -> Result<VariableKey, ConfigError> {
        let var = LinguisticVariable::new(name, role, universe, terms)?;

        self.variables.insert(var)
    }

    /// `variable is term`, resolved by name.
    pub fn term(&self, variable: &str, term: &str) -> Result<Expr, LookupError> {
        let key = self.variables.key(variable)?;
        let id = self.variables[key].term_id(term)?;

        Ok(Expr::Is(key, id))
    }

    pub fn rule(&mut self, premise: Expr, consequence: Expr) -> &mut Self {
        self.rules.add(premise, consequence);
        self
    }

    pub fn labeled_rule(&mut self, label: impl Into<String>, premise: Expr, consequence: Expr) -> &mut Self {
        self.rules.add_labeled(label, premise, consequence);
        self
    }

    pub fn build(self) -> Result<FuzzySystem, ConfigError> {
        let SystemBuilder { variables, rules } = self;
        let consequents: Vec<VariableKey> = variables
            .iter()
            .filter(|(_, var)| var.role() == Role::Consequent)
            .map(|(key, _)| key)
            .collect();

        let output = match consequents[..] {
            [output] => output,
            _ => return Err(ConfigError::ConsequentCount(consequents.len())),
        };

        if rules.is_empty() {
            return Err(ConfigError::NoRules);
        }

        let mut targets = Vec::with_capacity(rules.len());
        let mut referenced = HashSet::new();

        for (i, rule) in rules.iter().enumerate() {
            match rule.target() {
                Some((key, term)) if key == output => {
                    check_term(&variables, key, term)?;
                    targets.push(term);
                },
                _ => return Err(ConfigError::InvalidConsequent { rule: i }),
            }

            for (key, term) in rule.premise().propositions() {
                let var = check_term(&variables, key, term)?;

                if var.role() == Role::Consequent {
                    return Err(ConfigError::AntecedentRole {
                        rule: i,
                        variable: var.name().to_owned(),
                    });
                }

                referenced.insert(key);
            }
        }

        let required = variables.keys().filter(|key| referenced.contains(key)).collect();

        tracing::debug!(
            variables = variables.len(),
            rules = rules.len(),
            output = variables[output].name(),
            "built fuzzy system"
        );

        Ok(FuzzySystem {
            variables,
            rules,
            output,
            targets,
            required,
        })
    }
}

fn check_term(variables: &Variables, key: VariableKey, term: TermId) -> Result<&LinguisticVariable, LookupError> {
    let var = variables
        .get(key)
        .ok_or_else(|| LookupError::UnknownVariable(format!("{key:?}")))?;

    if term.index() >= var.terms().len() {
        return Err(LookupError::UnknownTerm {
            variable: var.name().to_owned(),
            term: format!("#{}", term.index()),
        });
    }

    Ok(var)
}

/// A validated Mamdani system: min for AND, max for OR, min implication, max
/// aggregation and centroid defuzzification.
///
/// Immutable once built, so a single instance can serve any number of
/// threads.
#[derive(Clone, Debug)]
pub struct FuzzySystem {
    variables: Variables,
    rules: Rules,
    output: VariableKey,
    // Consequent term of each rule, in rule order
    targets: Vec<TermId>,
    // Antecedent variables referenced by some rule, in declaration order
    required: Vec<VariableKey>,
}

impl FuzzySystem {
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules.0
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.variables[self.output]
    }

    pub fn required_inputs(&self) -> impl Iterator<Item = &str> + '_ {
        self.required.iter().map(|key| self.variables[*key].name())
    }

    pub fn key(&self, name: &str) -> Result<VariableKey, LookupError> {
        self.variables.key(name)
    }

    /// Resolves named values into [`Inputs`]. Names matching no variable are
    /// dropped with a warning.
    pub fn inputs_from_named<'a>(&self, named: impl IntoIterator<Item = (&'a str, f64)>) -> Inputs {
        let mut inputs = Inputs::with_capacity(self.required.len());

        for (name, value) in named {
            match self.variables.key(name) {
                Ok(key) => inputs.insert(key, value),
                Err(_) => tracing::warn!(variable = name, "ignoring input for unknown variable"),
            }
        }

        inputs
    }

    pub fn firing_strengths(&self, inputs: &Inputs) -> Result<Vec<f64>, InferenceError> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, rule)| -> Result<f64, InferenceError> {
                let strength = rule.premise().strength(&self.variables, inputs)?;

                tracing::trace!(rule = i, label = ?rule.label(), strength, "rule fired");

                Ok(strength)
            })
            .collect()
    }

    /// Clips each rule's consequent term at its strength and takes the
    /// pointwise max over the consequent universe. `strengths` is read in rule
    /// order; extra entries are ignored and missing ones count as not fired.
    pub fn aggregate(&self, strengths: &[f64]) -> Vec<f64> {
        let output = self.output();
        let mut aggregated = vec![0.; output.universe().len()];

        for (strength, term) in strengths.iter().zip(&self.targets) {
            let curve = output.curve(*term).iter().copied();

            ops::aggregate_into(&mut aggregated, ops::clip(*strength, curve));
        }

        aggregated
    }

    pub fn evaluate(&self, inputs: &Inputs) -> Result<Outputs, InferenceError> {
        if let Some(key) = self.required.iter().find(|key| inputs.get(**key).is_none()) {
            let name = self.variables[*key].name().to_owned();

            tracing::debug!(variable = %name, "missing input");

            return Err(InferenceError::MissingInput(name));
        }

        let strengths = self.firing_strengths(inputs)?;
        let aggregated = self.aggregate(&strengths);

        match ops::centroid(self.output().universe().points(), &aggregated) {
            Some(value) => Ok(Outputs::new(value, aggregated, strengths)),
            None => {
                tracing::debug!("no rule fired");

                Err(InferenceError::NoRuleFired)
            },
        }
    }

    pub fn infer(&self, inputs: &Inputs) -> Decision {
        self.evaluate(inputs).into()
    }

    pub fn infer_named(&self, named: &HashMap<String, f64>) -> Decision {
        let inputs = self.inputs_from_named(named.iter().map(|(name, value)| (name.as_str(), *value)));

        self.infer(&inputs)
    }

    /// Evaluates independent requests in parallel. Results keep the order of
    /// `batch`.
    pub fn infer_batch(&self, batch: &[Inputs]) -> Vec<Decision> {
        batch.par_iter().map(|inputs| self.infer(inputs)).collect()
    }
}

#[cfg(test)]
crate::terms! {
    enum Temp {
        Cold => "cold",
        Hot => "hot",
    }
}

#[cfg(test)]
crate::terms! {
    enum Fan {
        Slow => "slow",
        Fast => "fast",
    }
}

#[cfg(test)]
fn fan_system() -> (FuzzySystem, Variable<Temp>) {
    let mut builder = SystemBuilder::new();
    let temp = builder
        .antecedent(
            "temp",
            Universe::range(0., 40., 1.).unwrap(),
            Terms::new()
                .with(Temp::Cold, Shape::trapezoid(0., 0., 10., 20.).unwrap())
                .with(Temp::Hot, Shape::trapezoid(20., 30., 40., 40.).unwrap()),
        )
        .unwrap();
    let fan = builder
        .consequent(
            "fan",
            Universe::range(0., 10., 1.).unwrap(),
            Terms::new()
                .with(Fan::Slow, Shape::triangle(0., 0., 4.).unwrap())
                .with(Fan::Fast, Shape::triangle(6., 10., 10.).unwrap()),
        )
        .unwrap();

    builder
        .rule(temp.is(Temp::Cold), fan.is(Fan::Slow))
        .rule(temp.is(Temp::Hot), fan.is(Fan::Fast));

    (builder.build().unwrap(), temp)
}

#[test]
fn test_single_rule_centroid() {
    let (system, temp) = fan_system();
    let outputs = system.evaluate(&Inputs::new().with(temp, 35.)).unwrap();

    assert_eq!(outputs.strengths(), &[0., 1.]);
    // fast = triangle(6, 10, 10) sampled at 6..=10: 0, .25, .5, .75, 1
    let expected = (7. * 0.25 + 8. * 0.5 + 9. * 0.75 + 10.) / 2.5;

    assert!((outputs.value() - expected).abs() < 1e-12);
    assert_eq!(outputs.aggregated().len(), 11);
}

#[test]
fn test_clipping() {
    let (system, temp) = fan_system();
    // cold at 15 is 0.5
    let outputs = system.evaluate(&Inputs::new().with(temp, 15.)).unwrap();

    assert_eq!(outputs.strengths(), &[0.5, 0.]);
    assert_eq!(&outputs.aggregated()[..5], &[0.5, 0.5, 0.5, 0.25, 0.]);
    assert!(outputs.aggregated()[5..].iter().all(|m| *m == 0.));
}

#[test]
fn test_gap_between_terms_fires_nothing() {
    let (system, temp) = fan_system();

    assert_eq!(system.infer(&Inputs::new().with(temp, 20.)), Decision::NoRuleFired);
    assert_eq!(system.infer(&Inputs::new()), Decision::MissingInput("temp".to_owned()));
}

#[test]
fn test_not() {
    let mut builder = SystemBuilder::new();
    let temp = builder
        .antecedent(
            "temp",
            Universe::range(0., 40., 1.).unwrap(),
            Terms::new()
                .with(Temp::Cold, Shape::trapezoid(0., 0., 10., 20.).unwrap())
                .with(Temp::Hot, Shape::trapezoid(20., 30., 40., 40.).unwrap()),
        )
        .unwrap();
    let fan = builder
        .consequent(
            "fan",
            Universe::range(0., 10., 1.).unwrap(),
            Terms::new()
                .with(Fan::Slow, Shape::triangle(0., 0., 4.).unwrap())
                .with(Fan::Fast, Shape::triangle(6., 10., 10.).unwrap()),
        )
        .unwrap();

    builder.rule(temp.is(Temp::Hot).not(), fan.is(Fan::Slow));

    let system = builder.build().unwrap();
    let strengths = system.firing_strengths(&Inputs::new().with(temp, 25.)).unwrap();

    assert_eq!(strengths, vec![0.5]);
}

#[test]
fn test_named_inputs() {
    let (system, _) = fan_system();
    let named: HashMap<String, f64> = [("temp".to_owned(), 35.), ("humidity".to_owned(), 0.3)].into();

    assert!(matches!(system.infer_named(&named), Decision::Decided(v) if v > 8.));
    assert_eq!(system.required_inputs().collect::<Vec<_>>(), vec!["temp"]);
}

#[test]
fn test_missing_term_shape() {
    let mut builder = SystemBuilder::new();
    let result = builder.antecedent(
        "temp",
        Universe::range(0., 40., 1.).unwrap(),
        Terms::new().with(Temp::Cold, Shape::trapezoid(0., 0., 10., 20.).unwrap()),
    );

    assert!(matches!(
        result,
        Err(ConfigError::MissingTermShape { term, .. }) if term == "hot"
    ));
}

#[test]
fn test_build_validation() {
    let universe = Universe::range(0., 1., 0.5).unwrap();
    let shape = Shape::triangle(0., 0.5, 1.).unwrap();
    let terms = || vec![("low".to_owned(), shape)];

    let mut builder = SystemBuilder::new();
    builder.variable("a", Role::Antecedent, universe.clone(), terms()).unwrap();
    assert!(matches!(builder.build(), Err(ConfigError::ConsequentCount(0))));

    let mut builder = SystemBuilder::new();
    builder.variable("a", Role::Antecedent, universe.clone(), terms()).unwrap();
    builder.variable("out", Role::Consequent, universe.clone(), terms()).unwrap();
    let premise = builder.term("a", "low").unwrap();
    builder.rule(premise.clone(), premise);
    assert!(matches!(builder.build(), Err(ConfigError::InvalidConsequent { rule: 0 })));

    let mut builder = SystemBuilder::new();
    builder.variable("a", Role::Antecedent, universe.clone(), terms()).unwrap();
    builder.variable("out", Role::Consequent, universe.clone(), terms()).unwrap();
    let consequence = builder.term("out", "low").unwrap();
    builder.rule(consequence.clone(), consequence);
    assert!(matches!(builder.build(), Err(ConfigError::AntecedentRole { rule: 0, .. })));

    let mut builder = SystemBuilder::new();
    builder.variable("out", Role::Consequent, universe, terms()).unwrap();
    assert!(matches!(builder.build(), Err(ConfigError::NoRules)));
    assert!(SystemBuilder::new().term("a", "low").is_err());
}

#[test]
fn test_system_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<FuzzySystem>();
}
