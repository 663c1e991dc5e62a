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

use displaydoc::Display;
use thiserror::Error;

use crate::vector::TermVector;

/// Catalog vector {index} has {actual} dimensions but the query vector has {expected}
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
pub struct DimensionMismatch {
    pub expected: usize,
    pub actual: usize,
    pub index: usize,
}

fn cosine_similarity_with_norm(query: &TermVector, query_norm: f32, other: &TermVector) -> f32 {
    let other_norm = other.norm();
    if query_norm == 0. || other_norm == 0. {
        // a zero vector has no direction
        return 0.;
    }

    // term counts are non-negative, the clamp only absorbs rounding overshoot
    (query.dot(&**other) / (query_norm * other_norm)).clamp(0., 1.)
}

/// Computes the cosine similarity of two vectors of equal length.
///
/// The value is bounded in `[0, 1]` and is `0` if either vector is zero.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> Result<f32, DimensionMismatch> {
    if a.len() == b.len() {
        Ok(cosine_similarity_with_norm(a, a.norm(), b))
    } else {
        Err(DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
            index: 0,
        })
    }
}

/// Scores the query against every catalog vector, in catalog order.
///
/// # Errors
/// Fails as a whole if any catalog vector differs in length from the query.
pub fn score(query: &TermVector, catalog: &[TermVector]) -> Result<Vec<f32>, DimensionMismatch> {
    if let Some((index, vector)) = catalog
        .iter()
        .enumerate()
        .find(|(_, vector)| vector.len() != query.len())
    {
        return Err(DimensionMismatch {
            expected: query.len(),
            actual: vector.len(),
            index,
        });
    }

    let query_norm = query.norm();
    Ok(catalog
        .iter()
        .map(|vector| cosine_similarity_with_norm(query, query_norm, vector))
        .collect())
}

#[cfg(test)]
mod tests {
    use xayn_test_utils::assert_approx_eq;

    use super::*;

    #[test]
    fn test_self_similarity() {
        for vector in [[1., 0., 2.], [0.5, 7., 3.], [0., 0., 1.]] {
            let vector = TermVector::from(vector);
            assert_approx_eq!(f32, cosine_similarity(&vector, &vector).unwrap(), 1.);
        }
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = TermVector::zeros(3);
        let vector = TermVector::from([1., 2., 3.]);
        assert_eq!(cosine_similarity(&zero, &vector).unwrap(), 0.);
        assert_eq!(cosine_similarity(&vector, &zero).unwrap(), 0.);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.);
    }

    #[test]
    fn test_orthogonal_and_partial_overlap() {
        let a = TermVector::from([1., 0., 0.]);
        let b = TermVector::from([0., 3., 0.]);
        let c = TermVector::from([1., 1., 0.]);
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.);
        assert_approx_eq!(
            f32,
            cosine_similarity(&a, &c).unwrap(),
            std::f32::consts::FRAC_1_SQRT_2,
        );
    }

    #[test]
    fn test_similarity_is_bounded() {
        let vectors = [
            TermVector::from([1e-3, 0., 1e3]),
            TermVector::from([3., 3., 3.]),
            TermVector::from([1e6, 1e6, 1e6]),
            TermVector::from([0., 1., 100.]),
            TermVector::from([0.1, 0.2, 0.3]),
        ];
        for a in &vectors {
            for b in &vectors {
                let similarity = cosine_similarity(a, b).unwrap();
                assert!((0. ..=1.).contains(&similarity), "{similarity}");
            }
        }
    }

    #[test]
    fn test_score_in_catalog_order() {
        let query = TermVector::from([1., 0., 2.]);
        let catalog = [TermVector::from([1., 0., 2.]), TermVector::from([2., 1., 0.])];

        let scores = score(&query, &catalog).unwrap();

        assert_eq!(scores.len(), 2);
        assert_approx_eq!(f32, scores[0], 1.);
        assert_approx_eq!(f32, scores[1], 2. / (5_f32.sqrt() * 5_f32.sqrt()));
    }

    #[test]
    fn test_score_empty_catalog() {
        assert!(score(&TermVector::from([1.]), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_score_dimension_mismatch_aborts() {
        let query = TermVector::from([1., 0., 2.]);
        let catalog = [
            TermVector::from([1., 0., 2.]),
            TermVector::from([2., 1.]),
            TermVector::from([2., 1., 0., 0.]),
        ];

        assert_eq!(
            score(&query, &catalog).unwrap_err(),
            DimensionMismatch {
                expected: 3,
                actual: 2,
                index: 1,
            },
        );
        assert!(cosine_similarity(&TermVector::zeros(1), &TermVector::zeros(2)).is_err());
    }
}
