use crate::dsl::Expr;
use crate::variable::{TermId, VariableKey};

#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    // `consequence` is checked against the consequent in `SystemBuilder::build`
    pub fn add(&mut self, premise: Expr, consequence: Expr) {
        self.0.push(Rule {
            label: None,
            premise,
            consequence,
        });
    }

    pub fn add_labeled(&mut self, label: impl Into<String>, premise: Expr, consequence: Expr) {
        self.0.push(Rule {
            label: Some(label.into()),
            premise,
            consequence,
        });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }
}

#[derive(Clone, Debug)]
pub struct Rule {
    pub(crate) label: Option<String>,
    pub(crate) premise: Expr,
    pub(crate) consequence: Expr,
}

impl Rule {
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    pub fn consequence(&self) -> &Expr {
        &self.consequence
    }

    /// The concluded (variable, term), if the consequence is a single term.
    pub fn target(&self) -> Option<(VariableKey, TermId)> {
        match self.consequence {
            Expr::Is(var_key, term) => Some((var_key, term)),
            _ => None,
        }
    }
}
