pub use fixed_map::Key;
use fixed_map::Map as FixedMap;

use crate::membership::Shape;

/// The closed set of terms of one linguistic variable.
///
/// `ALL` lists the terms in declaration order, and `index` is the position in
/// that order. Both are generated by [`terms!`](crate::terms!).
pub trait Term: Key + Copy + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn index(self) -> usize;
}

/// Shapes assigned to the terms of `K`.
pub struct Terms<K: Term>(pub(crate) FixedMap<K, Shape>);

impl<K: Term> Terms<K> {
    pub fn new() -> Self {
        Self(FixedMap::new())
    }

    pub fn insert(&mut self, key: K, shape: Shape) {
        self.0.insert(key, shape);
    }

    pub fn with(mut self, key: K, shape: Shape) -> Self {
        self.insert(key, shape);
        self
    }

    pub fn get(&self, key: K) -> Option<&Shape> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Term> Default for Terms<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares a term enum for a linguistic variable.
///
/// ```ignore
/// terms! {
///     pub enum Lane {
///         Blocked => "obstruida",
///         Clear => "livre",
///     }
/// }
/// ```
///
/// Declaration order is the order used to break ties in
/// `LinguisticVariable::dominant_term`.
#[macro_export]
macro_rules! terms {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, $crate::Key)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::Term for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn index(self) -> usize {
                self as usize
            }
        }
    };
}

#[cfg(test)]
crate::terms! {
    enum Light {
        Dim => "dim",
        Bright => "bright",
    }
}

#[test]
fn test_term_enum() {
    assert_eq!(Light::ALL, &[Light::Dim, Light::Bright]);
    assert_eq!(Light::Bright.label(), "bright");
    assert_eq!(Light::Bright.index(), 1);
}

#[test]
fn test_terms_map() {
    let terms = Terms::new().with(Light::Bright, Shape::triangle(0., 1., 2.).unwrap());

    assert_eq!(terms.len(), 1);
    assert!(terms.get(Light::Dim).is_none());
    assert!(terms.get(Light::Bright).is_some());
}
