use num::Float;

/// `n` evenly spaced samples over `[start, end]`, both ends included.
///
/// Interior samples are `start + step * i` like `numpy.linspace`, and the last
/// one is pinned to `end` so rounding never moves the upper bound.
pub struct Linspace<F> {
    start: F,
    end: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(start: F, end: F, n: usize) -> Self {
        let step = match F::from(n.saturating_sub(1)) {
            Some(steps) if n > 1 => (end - start) / steps,
            _ => F::zero(),
        };

        Linspace {
            start,
            end,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        if i > 0 && i + 1 == self.len {
            return Some(self.end);
        }

        // usize -> float never fails for Float types, it only rounds
        Some(self.start + self.step * F::from(i).unwrap_or_else(F::zero))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let points: Vec<f64> = Linspace::new(0., 1., 11).collect();

    assert_eq!(points.len(), 11);
    assert_eq!(points[0], 0.);
    assert_eq!(points[10], 1.);
    assert!((points[3] - 0.3).abs() < 1e-12);

    let single: Vec<f64> = Linspace::new(5., 5., 1).collect();

    assert_eq!(single, vec![5.]);
    assert_eq!(Linspace::new(0., 0.3, 4).last(), Some(0.3f64));
    assert_eq!(Linspace::<f32>::new(0., 1., 0).count(), 0);
}
