use std::fmt;

use crate::error::ConfigError;
use crate::linspace::Linspace;

// Slack for float division when counting steps, so that 0.7 / 0.1 still yields 7 steps
const STEP_EPSILON: f64 = 1e-9;

/// Upper bound on the number of samples in a range universe.
pub const MAX_SAMPLES: usize = 1_000_000;

/// The ordered sample points a variable is discretized over.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe(Vec<f64>);

impl Universe {
    /// Uniform samples from `min` to `max` inclusive, `step` apart. A trailing
    /// partial step is dropped, like numpy.arange.
    pub fn range(min: f64, max: f64, step: f64) -> Result<Self, ConfigError> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) || step <= 0. || max < min {
            return Err(ConfigError::InvalidUniverseStep { min, max, step });
        }

        let span = (max - min) / step;
        let steps = (span + STEP_EPSILON).floor();

        if !steps.is_finite() || steps >= MAX_SAMPLES as f64 {
            return Err(ConfigError::InvalidUniverseStep { min, max, step });
        }

        let end = if (span - steps).abs() < STEP_EPSILON {
            max
        } else {
            min + step * steps
        };
        let num = (steps as usize)
            .checked_add(1)
            .ok_or(ConfigError::InvalidUniverseStep { min, max, step })?;

        Ok(Universe(Linspace::new(min, end, num).collect()))
    }

    pub fn from_points(points: Vec<f64>) -> Result<Self, ConfigError> {
        if points.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ConfigError::NonIncreasingUniverse { index });
        }

        if let Some(index) = points.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ConfigError::NonIncreasingUniverse { index: index + 1 });
        }

        Ok(Universe(points))
    }

    pub fn points(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.0[0]
    }

    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapeKind {
    Triangle,
    Trapezoid,
}

/// A piecewise linear membership function. Triangles are stored as
/// trapezoids with a single-point plateau.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    points: [f64; 4],
}

impl Shape {
    pub fn triangle(a: f64, b: f64, c: f64) -> Result<Self, ConfigError> {
        Self::validated(ShapeKind::Triangle, [a, b, b, c])
    }

    pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> Result<Self, ConfigError> {
        Self::validated(ShapeKind::Trapezoid, [a, b, c, d])
    }

    fn validated(kind: ShapeKind, points: [f64; 4]) -> Result<Self, ConfigError> {
        let [a, b, c, d] = points;
        let finite = points.iter().all(|p| p.is_finite());

        if !finite || !(a <= b && b <= c && c <= d) {
            return Err(ConfigError::InvalidShapeParameters { a, b, c, d });
        }

        Ok(Shape { kind, points })
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// `[a, b, c, d]`; for triangles `b == c`.
    pub fn breakpoints(&self) -> [f64; 4] {
        self.points
    }

    /// Interval where the degree is nonzero, endpoints excluded unless a ramp
    /// is vertical.
    pub fn support(&self) -> (f64, f64) {
        (self.points[0], self.points[3])
    }

    /// Interval where the degree is one.
    pub fn core(&self) -> (f64, f64) {
        (self.points[1], self.points[2])
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let [a, b, c, d] = self.points;

        if x.is_nan() {
            return 0.;
        }

        // The plateau is checked first so vertical edges (a == b, c == d) belong to it
        let degree = if b <= x && x <= c {
            1.
        } else if x <= a || x >= d {
            0.
        } else if x < b {
            (x - a) / (b - a)
        } else {
            (d - x) / (d - c)
        };

        degree.clamp(0., 1.)
    }

    pub fn evaluate_over(&self, universe: &Universe) -> Vec<f64> {
        universe.points().iter().map(|x| self.evaluate(*x)).collect()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.points;

        match self.kind {
            ShapeKind::Triangle => write!(f, "triangle({a}, {b}, {d})"),
            ShapeKind::Trapezoid => write!(f, "trapezoid({a}, {b}, {c}, {d})"),
        }
    }
}

#[test]
fn test_trapezoid_breakpoints() {
    let shape = Shape::trapezoid(1., 2., 4., 6.).unwrap();

    assert_eq!(shape.evaluate(1.), 0.);
    assert_eq!(shape.evaluate(2.), 1.);
    assert_eq!(shape.evaluate(4.), 1.);
    assert_eq!(shape.evaluate(6.), 0.);
    assert_eq!(shape.evaluate(1.5), 0.5);
    assert_eq!(shape.evaluate(5.), 0.5);
    assert_eq!(shape.evaluate(-100.), 0.);
    assert_eq!(shape.evaluate(100.), 0.);
}

#[test]
fn test_vertical_edges() {
    // distancia['muito_curta'] and distancia['muito_longa'] shapes
    let left = Shape::trapezoid(0., 0., 100., 200.).unwrap();
    let right = Shape::trapezoid(300., 400., 500., 500.).unwrap();

    assert_eq!(left.evaluate(0.), 1.);
    assert_eq!(left.evaluate(-0.5), 0.);
    assert_eq!(left.evaluate(150.), 0.5);
    assert_eq!(right.evaluate(500.), 1.);
    assert_eq!(right.evaluate(500.5), 0.);
    assert_eq!(right.evaluate(350.), 0.5);
}

#[test]
fn test_triangle() {
    let shape = Shape::triangle(150., 250., 350.).unwrap();

    assert_eq!(shape.kind(), ShapeKind::Triangle);
    assert_eq!(shape.breakpoints(), [150., 250., 250., 350.]);
    assert_eq!(shape.support(), (150., 350.));
    assert_eq!(shape.core(), (250., 250.));
    assert_eq!(shape.evaluate(250.), 1.);
    assert_eq!(shape.evaluate(200.), 0.5);
    assert_eq!(shape.evaluate(300.), 0.5);
    assert_eq!(shape.evaluate(150.), 0.);
    assert_eq!(shape.evaluate(350.), 0.);
    assert_eq!(shape.to_string(), "triangle(150, 250, 350)");
}

#[test]
fn test_nan_is_zero() {
    let shape = Shape::triangle(0., 0.5, 1.).unwrap();

    assert_eq!(shape.evaluate(f64::NAN), 0.);
}

#[test]
fn test_invalid_shapes() {
    assert!(matches!(
        Shape::trapezoid(0., 2., 1., 3.),
        Err(ConfigError::InvalidShapeParameters { .. })
    ));
    assert!(matches!(
        Shape::triangle(1., 0., 2.),
        Err(ConfigError::InvalidShapeParameters { .. })
    ));
    assert!(Shape::triangle(0., f64::NAN, 1.).is_err());
    assert!(Shape::trapezoid(2., 2., 2., 2.).is_ok());
}

#[test]
fn test_universe_range() {
    let unit = Universe::range(0., 1., 0.1).unwrap();

    assert_eq!(unit.len(), 11);
    assert_eq!(unit.min(), 0.);
    assert_eq!(unit.max(), 1.);

    let distance = Universe::range(0., 500., 1.).unwrap();

    assert_eq!(distance.len(), 501);
    assert_eq!(distance.points()[250], 250.);

    let partial = Universe::range(0., 1., 0.3).unwrap();

    assert_eq!(partial.len(), 4);
    assert!((partial.max() - 0.9).abs() < 1e-12);

    assert_eq!(Universe::range(0.5, 0.5, 0.1).unwrap().points(), &[0.5]);
    assert!(Universe::range(0., 1., 0.).is_err());
    assert!(Universe::range(1., 0., 0.1).is_err());
}

#[test]
fn test_universe_range_sample_cap() {
    assert!(matches!(
        Universe::range(0., 1., 1e-300),
        Err(ConfigError::InvalidUniverseStep { .. })
    ));
    assert!(matches!(
        Universe::range(-f64::MAX, f64::MAX, 1.),
        Err(ConfigError::InvalidUniverseStep { .. })
    ));
    assert!(Universe::range(0., 1e6, 1.).is_err());
    assert_eq!(Universe::range(0., 1e6 - 2., 1.).unwrap().len(), MAX_SAMPLES - 1);
}

#[test]
fn test_universe_from_points() {
    assert!(Universe::from_points(vec![0., 1., 3.]).is_ok());
    assert!(matches!(Universe::from_points(vec![]), Err(ConfigError::EmptyUniverse)));
    assert!(matches!(
        Universe::from_points(vec![0., 2., 2.]),
        Err(ConfigError::NonIncreasingUniverse { index: 2 })
    ));
}

#[test]
fn test_evaluate_over() {
    let universe = Universe::range(0., 1., 0.1).unwrap();
    let curve = Shape::trapezoid(0., 0., 0.2, 0.5).unwrap().evaluate_over(&universe);

    assert_eq!(curve.len(), 11);
    assert_eq!(&curve[..3], &[1., 1., 1.]);
    assert!((curve[3] - 2. / 3.).abs() < 1e-12);
    assert!(curve[5..].iter().all(|d| *d == 0.));
}
