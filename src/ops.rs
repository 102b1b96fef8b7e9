use num::Float;

/// Zadeh intersection, used for AND in rule premises.
#[inline]
pub fn and<F: Float>(u: F, v: F) -> F {
    F::min(u, v)
}

/// Zadeh union, used for OR in rule premises.
#[inline]
pub fn or<F: Float>(u: F, v: F) -> F {
    F::max(u, v)
}

#[inline]
pub fn not<F: Float>(u: F) -> F {
    F::one() - u
}

/// Mamdani implication: the consequence membership clipped at the rule's
/// firing strength.
pub fn clip<F: Float>(strength: F, membership: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
    membership.into_iter().map(move |m| F::min(strength, m))
}

/// Max production link: folds `membership` into `aggregated` pointwise.
pub fn aggregate_into<F: Float>(aggregated: &mut [F], membership: impl IntoIterator<Item = F>) {
    for (agg, m) in aggregated.iter_mut().zip(membership) {
        *agg = F::max(*agg, m);
    }
}

/// Center of gravity over the sample points: `Σ x·μ(x) / Σ μ(x)`.
///
/// `None` when the membership is zero everywhere, since the centroid is then
/// undefined.
pub fn centroid<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let (num, den) = universe
        .iter()
        .zip(membership)
        .fold((F::zero(), F::zero()), |(num, den), (x, m)| (num + *x * *m, den + *m));

    if den == F::zero() {
        None
    } else {
        Some(num / den)
    }
}

#[test]
fn test_connectives() {
    assert_eq!(and(0.6, 0.4), 0.4);
    assert_eq!(or(0.6, 0.4), 0.6);
    assert_eq!(not(0.25), 0.75);
}

#[test]
fn test_clip_and_aggregate() {
    let mut agg = vec![0.; 4];

    aggregate_into(&mut agg, clip(0.5, [0., 0.25, 1., 1.]));
    assert_eq!(agg, vec![0., 0.25, 0.5, 0.5]);

    aggregate_into(&mut agg, clip(0.3, [1., 1., 0., 0.]));
    assert_eq!(agg, vec![0.3, 0.3, 0.5, 0.5]);
}

#[test]
fn test_centroid() {
    let universe = [0., 1., 2., 3., 4.];

    assert_eq!(centroid(&universe, &[0., 1., 1., 1., 0.]), Some(2.));
    assert_eq!(centroid(&universe, &[1., 0., 0., 0., 1.]), Some(2.));
    assert_eq!(centroid(&universe, &[0., 0., 0., 0., 0.5]), Some(4.));
    assert_eq!(centroid(&universe, &[0.; 5]), None);
}
