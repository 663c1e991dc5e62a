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
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cache, catalog::VectorSpace, engine::Engine};

/// Configurations of the recommender.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
#[must_use]
pub struct Config {
    redundancy_threshold: f32,
    repetition_multiplier: f32,
    cache: cache::Config,
}

// the f32 fields are never NaN by construction
impl Eq for Config {}

impl Default for Config {
    fn default() -> Self {
        Self {
            redundancy_threshold: 0.75,
            repetition_multiplier: 10.,
            cache: cache::Config::default(),
        }
    }
}

/// Errors of the recommender configuration.
#[derive(Copy, Clone, Debug, Display, Error)]
pub enum Error {
    /// Invalid redundancy threshold, expected value from the unit interval
    RedundancyThreshold,
    /// Invalid repetition multiplier, expected finite positive value
    RepetitionMultiplier,
    /// Invalid cache time to live, expected a bounded cache capacity
    TimeToLive,
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0. ..=1.).contains(&self.redundancy_threshold) {
            return Err(Error::RedundancyThreshold);
        }
        if !(self.repetition_multiplier.is_finite() && self.repetition_multiplier > 0.) {
            return Err(Error::RepetitionMultiplier);
        }
        if self.cache.time_to_live.is_some() && self.cache.capacity == 0 {
            return Err(Error::TimeToLive);
        }

        Ok(())
    }

    /// The title similarity above which a course counts as already taken.
    pub fn redundancy_threshold(&self) -> f32 {
        self.redundancy_threshold
    }

    /// Sets the redundancy threshold.
    ///
    /// # Errors
    /// Fails if the threshold is outside of the unit interval.
    pub fn with_redundancy_threshold(mut self, redundancy_threshold: f32) -> Result<Self, Error> {
        self.redundancy_threshold = redundancy_threshold;
        self.validate()?;

        Ok(self)
    }

    /// The factor from grade weights to description repetitions.
    pub fn repetition_multiplier(&self) -> f32 {
        self.repetition_multiplier
    }

    /// Sets the repetition multiplier.
    ///
    /// # Errors
    /// Fails if the multiplier is not positive.
    pub fn with_repetition_multiplier(mut self, repetition_multiplier: f32) -> Result<Self, Error> {
        self.repetition_multiplier = repetition_multiplier;
        self.validate()?;

        Ok(self)
    }

    pub fn cache(&self) -> &cache::Config {
        &self.cache
    }

    /// Sets the cache configuration.
    ///
    /// # Errors
    /// Fails if a time to live is set for an unbounded cache.
    pub fn with_cache(mut self, cache: cache::Config) -> Result<Self, Error> {
        self.cache = cache;
        self.validate()?;

        Ok(self)
    }

    /// Creates a recommender engine over the vector space.
    pub fn build(self, space: VectorSpace) -> Engine {
        Engine::new(self, space)
    }
}
