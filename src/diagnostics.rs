//! Introspection for presentation layers: "label (degree)" readouts and the
//! data needed to plot membership curves with an input marker.

use crate::error::LookupError;
use crate::inference::FuzzySystem;
use crate::outputs::Outputs;
use crate::variable::TermDegree;

/// One term's curve over a variable's universe.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub term: String,
    pub degrees: Vec<f64>,
}

/// Everything needed to draw a variable: its universe, one series per term in
/// declaration order, and an optional vertical marker at the current input.
#[derive(Clone, Debug, PartialEq)]
pub struct VariablePlot {
    pub variable: String,
    pub universe: Vec<f64>,
    pub series: Vec<Series>,
    pub marker: Option<f64>,
}

impl FuzzySystem {
    /// The strongest term of `variable` at `value`; ties go to the term
    /// declared first.
    pub fn dominant_term(&self, variable: &str, value: f64) -> Result<TermDegree<'_>, LookupError> {
        Ok(self.variables().by_name(variable)?.dominant_term(value))
    }

    /// `(x, degree)` pairs for one term over its variable's universe.
    pub fn curve(&self, variable: &str, term: &str) -> Result<Vec<(f64, f64)>, LookupError> {
        let var = self.variables().by_name(variable)?;
        let id = var.term_id(term)?;
        let points = var.universe().points().iter().copied();

        Ok(points.zip(var.curve(id).iter().copied()).collect())
    }

    /// Degree of every term at `value`, in declaration order.
    pub fn fuzzify(&self, variable: &str, value: f64) -> Result<Vec<TermDegree<'_>>, LookupError> {
        let var = self.variables().by_name(variable)?;

        Ok(var
            .terms()
            .iter()
            .map(|def| TermDegree {
                term: def.name(),
                degree: def.shape().evaluate(value),
            })
            .collect())
    }

    pub fn plot(&self, variable: &str, marker: Option<f64>) -> Result<VariablePlot, LookupError> {
        let var = self.variables().by_name(variable)?;

        Ok(VariablePlot {
            variable: var.name().to_owned(),
            universe: var.universe().points().to_vec(),
            series: var
                .terms()
                .iter()
                .map(|def| Series {
                    term: def.name().to_owned(),
                    degrees: def.curve().to_vec(),
                })
                .collect(),
            marker,
        })
    }

    /// Plot of the consequent with the aggregated curve of `outputs` appended
    /// as an extra series and the crisp output as the marker.
    pub fn output_plot(&self, outputs: &Outputs) -> VariablePlot {
        let var = self.output();
        let mut series: Vec<Series> = var
            .terms()
            .iter()
            .map(|def| Series {
                term: def.name().to_owned(),
                degrees: def.curve().to_vec(),
            })
            .collect();

        series.push(Series {
            term: "aggregated".to_owned(),
            degrees: outputs.aggregated().to_vec(),
        });

        VariablePlot {
            variable: var.name().to_owned(),
            universe: var.universe().points().to_vec(),
            series,
            marker: Some(outputs.value()),
        }
    }
}
