// Copyright 2023 Xayn AG
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::iter;

use float_cmp::ApproxEq;
use ndarray::{ArrayBase, Data, Dimension, IntoDimension, Ix};

/// Asserts that two floats or containers of floats are approximately equal.
///
/// Scalars, slices, arrays, vectors, options and ndarray arrays can be mixed as long as they
/// have the same logical shape:
///
/// ```
/// use ndarray::arr1;
/// use xayn_test_utils::assert_approx_eq;
///
/// assert_approx_eq!(f32, 0.150_391_55, 0.150_391_6, ulps = 3);
/// assert_approx_eq!(f32, vec![0.5, 1.], arr1(&[0.5, 1.]));
/// assert_approx_eq!(f32, [[0.25, 1.]], &[[0.25, 1.]]);
/// ```
///
/// The `ulps` default to `2` and the `epsilon` to `0`. Two NaNs are considered equal, the
/// assertion checks for an expected outcome and not for numerical semantics.
#[macro_export]
macro_rules! assert_approx_eq {
    ($t:ty, $left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = 0., ulps = 2)
    };
    ($t:ty, $left:expr, $right:expr, ulps = $ulps:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = 0., ulps = $ulps)
    };
    ($t:ty, $left:expr, $right:expr, epsilon = $epsilon:expr $(,)?) => {
        $crate::assert_approx_eq!($t, $left, $right, epsilon = $epsilon, ulps = 2)
    };
    ($t:ty, $left:expr, $right:expr, epsilon = $epsilon:expr, ulps = $ulps:expr $(,)?) => {{
        let (epsilon, ulps) = ($epsilon, $ulps);
        let (left, right) = (&$left, &$right);
        let mut left = $crate::ApproxEqIter::<$t>::leaves(left, Vec::new());
        let mut right = $crate::ApproxEqIter::<$t>::leaves(right, Vec::new());
        loop {
            match (left.next(), right.next()) {
                (Some((left_index, left_value)), Some((right_index, right_value))) => {
                    std::assert_eq!(
                        left_index, right_index,
                        "Shapes differ: {:?} != {:?}",
                        left_index, right_index,
                    );
                    std::assert!(
                        (left_value.is_nan() && right_value.is_nan())
                            || $crate::approx_eq!(
                                $t, left_value, right_value, ulps = ulps, epsilon = epsilon
                            ),
                        "Values differ (ulps={:?}, epsilon={:?}) at index {:?}: {:?} != {:?}",
                        ulps, epsilon, left_index, left_value, right_value,
                    );
                }
                (Some((index, _)), None) => {
                    std::panic!("Left side is longer starting from index {:?}", index);
                }
                (None, Some((index, _))) => {
                    std::panic!("Right side is longer starting from index {:?}", index);
                }
                (None, None) => break,
            }
        }
    }};
}

/// Flattens a value into its float leaves, only meant for [`assert_approx_eq!`].
pub trait ApproxEqIter<'a, Leaf>
where
    Self: 'a,
    Leaf: ApproxEq + Copy,
{
    /// Iterates over all leaves in logical order together with their multi-dimensional index,
    /// which starts with the given prefix.
    fn leaves(&'a self, prefix: Vec<Ix>) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, Leaf)>>;
}

fn indexed<'a, T, Leaf>(
    items: impl 'a + Iterator<Item = &'a T>,
    prefix: Vec<Ix>,
) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, Leaf)>>
where
    T: 'a + ApproxEqIter<'a, Leaf> + ?Sized,
    Leaf: 'a + ApproxEq + Copy,
{
    Box::new(items.enumerate().flat_map(move |(index, item)| {
        let mut prefix = prefix.clone();
        prefix.push(index);
        item.leaves(prefix)
    }))
}

macro_rules! impl_approx_eq_iter {
    ($($leaf:ty),+ $(,)?) => {
        $(
            impl<'a> ApproxEqIter<'a, $leaf> for $leaf {
                fn leaves(
                    &'a self,
                    prefix: Vec<Ix>,
                ) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, $leaf)>> {
                    Box::new(iter::once((prefix, *self)))
                }
            }

            impl<'a, T> ApproxEqIter<'a, $leaf> for &'a T
            where
                T: 'a + ApproxEqIter<'a, $leaf> + ?Sized,
            {
                fn leaves(
                    &'a self,
                    prefix: Vec<Ix>,
                ) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, $leaf)>> {
                    (*self).leaves(prefix)
                }
            }

            impl<'a, T> ApproxEqIter<'a, $leaf> for Option<T>
            where
                T: 'a + ApproxEqIter<'a, $leaf>,
            {
                fn leaves(
                    &'a self,
                    prefix: Vec<Ix>,
                ) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, $leaf)>> {
                    indexed(self.iter(), prefix)
                }
            }

            impl<'a, T> ApproxEqIter<'a, $leaf> for [T]
            where
                T: 'a + ApproxEqIter<'a, $leaf>,
            {
                fn leaves(
                    &'a self,
                    prefix: Vec<Ix>,
                ) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, $leaf)>> {
                    indexed(self.iter(), prefix)
                }
            }

            impl<'a, T, const N: usize> ApproxEqIter<'a, $leaf> for [T; N]
            where
                T: 'a + ApproxEqIter<'a, $leaf>,
            {
                fn leaves(
                    &'a self,
                    prefix: Vec<Ix>,
                ) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, $leaf)>> {
                    indexed(self.iter(), prefix)
                }
            }

            impl<'a, T> ApproxEqIter<'a, $leaf> for Vec<T>
            where
                T: 'a + ApproxEqIter<'a, $leaf>,
            {
                fn leaves(
                    &'a self,
                    prefix: Vec<Ix>,
                ) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, $leaf)>> {
                    indexed(self.iter(), prefix)
                }
            }

            impl<'a, S, D> ApproxEqIter<'a, $leaf> for ArrayBase<S, D>
            where
                S: 'a + Data<Elem = $leaf>,
                D: 'a + Dimension,
            {
                fn leaves(
                    &'a self,
                    prefix: Vec<Ix>,
                ) -> Box<dyn 'a + Iterator<Item = (Vec<Ix>, $leaf)>> {
                    Box::new(self.indexed_iter().map(move |(index, leaf)| {
                        let mut prefix = prefix.clone();
                        prefix.extend(index.into_dimension().as_array_view().iter());
                        (prefix, *leaf)
                    }))
                }
            }
        )+
    };
}

impl_approx_eq_iter! { f32, f64 }
