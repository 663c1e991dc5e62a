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

use derive_more::{Deref, From};
use ndarray::Array1;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A dense term-frequency vector over a vocabulary.
///
/// The vector is of shape `(vocabulary_size,)`. The serde is identical to a `Vec<f32>`.
#[derive(Clone, Debug, Default, Deref, From, PartialEq)]
pub struct TermVector(Array1<f32>);

impl TermVector {
    /// Creates the all-zero vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self(Array1::zeros(len))
    }

    /// The euclidean norm.
    pub fn norm(&self) -> f32 {
        self.0.dot(&self.0).sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&value| value == 0.)
    }

    pub(crate) fn increment(&mut self, index: usize) {
        self.0[index] += 1.;
    }
}

impl From<Vec<f32>> for TermVector {
    fn from(vec: Vec<f32>) -> Self {
        Array1::from_vec(vec).into()
    }
}

impl<const N: usize> From<[f32; N]> for TermVector {
    fn from(array: [f32; N]) -> Self {
        Vec::from(array).into()
    }
}

impl Serialize for TermVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.0)
    }
}

impl<'de> Deserialize<'de> for TermVector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<f32>::deserialize(deserializer).map(Self::from)
    }
}
