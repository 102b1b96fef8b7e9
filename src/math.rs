use num::Float;

/// Similar to numpy.interp, for a single point. `coords` must be sorted by x.
///
/// Values left of the first coordinate take the first y, values right of the
/// last take the last y. Returns `None` for an empty coordinate list or a NaN
/// point.
pub(crate) fn interp<F: Float>(x: F, coords: impl IntoIterator<Item = (F, F)>) -> Option<F> {
    let mut iter = coords.into_iter();
    let (x0, y0) = iter.next()?;

    if x.is_nan() {
        return None;
    }

    if x <= x0 {
        return Some(y0);
    }

    let (mut x1, mut y1) = (x0, y0);

    for (x2, y2) in iter {
        if x <= x2 {
            if x2 == x1 {
                return Some(y2);
            }

            return Some(y1 + (x - x1) * (y2 - y1) / (x2 - x1));
        }

        x1 = x2;
        y1 = y2;
    }

    Some(y1)
}

#[test]
fn test_interp() {
    let x = [0., 1., 1.5, 2.72, 3.24];
    let xs = [1., 2., 3.];
    let ys = [3., 2., 0.];
    let out: Vec<f64> = x
        .iter()
        .map(|x| interp(*x, xs.into_iter().zip(ys)).unwrap())
        .collect();

    assert_eq!(out, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let x = [2.5, -1., 7.5];
    let xs = [0., 1., 2., 3., 4.5];
    let ys = [0., 2., 5., 3., 2.];
    let out: Vec<f64> = x
        .iter()
        .map(|x| interp(*x, xs.into_iter().zip(ys)).unwrap())
        .collect();

    assert_eq!(out, vec![4., 0., 2.]);
}

#[test]
fn test_interp_degenerate() {
    assert_eq!(interp(1.0f64, std::iter::empty()), None);
    assert_eq!(interp(f64::NAN, [(0., 1.)]), None);
    assert_eq!(interp(3.0f64, [(2., 0.5)]), Some(0.5));
}
