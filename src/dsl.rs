use crate::error::InferenceError;
use crate::inputs::Inputs;
use crate::ops;
use crate::terms::Term;
use crate::variable::{TermId, Variable, VariableKey, Variables};

/// A rule antecedent: terms combined with Zadeh AND (min), OR (max) and NOT
/// (complement).
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(VariableKey, TermId),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn and(self, rhs: Expr) -> Self {
        Expr::And(Box::new(self), Box::new(rhs))
    }

    pub fn or(self, rhs: Expr) -> Self {
        Expr::Or(Box::new(self), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Left fold of `exprs` with AND. `None` when empty.
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        exprs.into_iter().reduce(Expr::and)
    }

    /// Left fold of `exprs` with OR. `None` when empty.
    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        exprs.into_iter().reduce(Expr::or)
    }

    /// Every (variable, term) the expression mentions, left to right.
    pub fn propositions(&self) -> Vec<(VariableKey, TermId)> {
        let mut props = Vec::new();

        fn parse(expr: &Expr, out: &mut Vec<(VariableKey, TermId)>) {
            match expr {
                Expr::Is(var_key, term) => out.push((*var_key, *term)),
                Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
                Expr::Not(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }

    /// Degree to which the expression holds for `inputs`.
    pub fn strength(&self, vars: &Variables, inputs: &Inputs) -> Result<f64, InferenceError> {
        match self {
            Expr::Is(var_key, term) => {
                let var = &vars[*var_key];
                let value = inputs
                    .get(*var_key)
                    .ok_or_else(|| InferenceError::MissingInput(var.name().to_owned()))?;

                Ok(var.term_degree(*term, value))
            },
            Expr::And(lhs, rhs) => {
                let left = lhs.strength(vars, inputs)?;
                let right = rhs.strength(vars, inputs)?;

                Ok(ops::and(left, right))
            },
            Expr::Or(lhs, rhs) => {
                let left = lhs.strength(vars, inputs)?;
                let right = rhs.strength(vars, inputs)?;

                Ok(ops::or(left, right))
            },
            Expr::Not(expr) => Ok(ops::not(expr.strength(vars, inputs)?)),
        }
    }
}

impl<I: Term> Variable<I> {
    pub fn is(self, rhs: I) -> Expr {
        Expr::Is(self.0, TermId(rhs.index()))
    }
}
