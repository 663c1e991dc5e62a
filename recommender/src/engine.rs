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

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::{
    cache::{RecommendationCache, Storage},
    catalog::{LoadError, VectorSpace},
    config::Config,
    filter::filter_by_allowed_subjects,
    fingerprint::generate_fingerprint,
    pipeline::{recommend_base, ScoredCourse},
    profile::StudentRecord,
    similarity::DimensionMismatch,
};

/// A vector space together with the recommendations computed against it.
struct Generation {
    space: Arc<VectorSpace>,
    cache: RecommendationCache<Storage>,
}

/// The course recommender.
///
/// Requests work on the vector space which was current when they started, a reload never
/// affects requests in flight.
pub struct Engine {
    config: Config,
    current: RwLock<Arc<Generation>>,
}

impl Engine {
    pub(crate) fn new(config: Config, space: VectorSpace) -> Self {
        let current = Generation {
            space: Arc::new(space),
            cache: RecommendationCache::new(config.cache().build_storage()),
        };

        Self {
            config,
            current: RwLock::new(Arc::new(current)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current vector space.
    pub async fn space(&self) -> Arc<VectorSpace> {
        self.current.read().await.space.clone()
    }

    /// The number of cached base recommendations of the current vector space.
    pub async fn cached(&self) -> usize {
        let current = self.current.read().await.clone();
        current.cache.len().await
    }

    /// Computes the base recommendations without the cache.
    pub async fn recommend_base(
        &self,
        record: &StudentRecord,
    ) -> Result<Vec<ScoredCourse>, DimensionMismatch> {
        recommend_base(&*self.space().await, record, &self.config)
    }

    /// Recommends courses for the student.
    ///
    /// The base recommendations are cached per fingerprint and restricted to the allowed subjects
    /// of the student afterwards.
    #[instrument(skip_all)]
    pub async fn recommend(
        &self,
        record: &StudentRecord,
    ) -> Result<Vec<ScoredCourse>, DimensionMismatch> {
        let current = self.current.read().await.clone();
        let fingerprint = generate_fingerprint(record);
        let base = current
            .cache
            .get_or_compute(&fingerprint, || {
                recommend_base(&current.space, record, &self.config)
            })
            .await?;

        Ok(filter_by_allowed_subjects(&base, &record.allowed_subjects))
    }

    /// Replaces the vector space by a newly loaded one.
    ///
    /// The new space starts with an empty cache. If loading fails the current space and its cache
    /// stay in use.
    #[instrument(skip_all)]
    pub async fn reload<F>(&self, load: F) -> Result<(), LoadError>
    where
        F: FnOnce() -> Result<VectorSpace, LoadError>,
    {
        let space = load().map_err(|error| {
            error!(%error, "failed to reload the vector space, keeping the current one");
            error
        })?;
        let generation = Arc::new(Generation {
            space: Arc::new(space),
            cache: RecommendationCache::new(self.config.cache().build_storage()),
        });
        info!(
            vocabulary = generation.space.vocabulary().len(),
            courses = generation.space.len(),
            "reloaded the vector space",
        );
        *self.current.write().await = generation;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use itertools::Itertools;

    use super::*;
    use crate::{
        catalog::tests::{course, vocabulary},
        pipeline::tests::{sample_space, student},
        profile::tests::taken,
    };

    fn subjects(recommendations: &[ScoredCourse]) -> Vec<&str> {
        recommendations
            .iter()
            .map(|scored| scored.course.subject.as_str())
            .unique()
            .sorted()
            .collect()
    }

    fn data_student(allowed_subjects: &[&str]) -> StudentRecord {
        let mut record = student(
            Some("data scientist"),
            vec![
                taken("Intro to Programming", "Programming in Python", Some("B")),
                taken("Calculus I", "limits derivatives and integrals", Some("C+")),
            ],
        );
        record.allowed_subjects = allowed_subjects.iter().map(ToString::to_string).collect();
        record
    }

    #[tokio::test]
    async fn test_recommend_caches_base_and_filters_subjects() {
        let engine = Config::default().build(sample_space());

        let all = engine.recommend(&data_student(&[])).await.unwrap();
        let only_math = engine.recommend(&data_student(&["MATH"])).await.unwrap();

        assert_eq!(engine.cached().await, 1);
        assert_eq!(subjects(&all), ["BIOL", "CS", "MATH"]);
        assert_eq!(subjects(&only_math), ["MATH"]);
        assert_eq!(
            only_math,
            all.iter()
                .filter(|scored| scored.course.subject == "MATH")
                .cloned()
                .collect_vec(),
        );
        assert_eq!(
            all,
            engine.recommend_base(&data_student(&["MATH"])).await.unwrap(),
        );
    }

    #[tokio::test]
    async fn test_reload_replaces_space_and_cache() {
        let engine = Config::default().build(sample_space());
        engine.recommend(&data_student(&[])).await.unwrap();
        assert_eq!(engine.cached().await, 1);

        let loads = AtomicUsize::new(0);
        engine
            .reload(|| {
                loads.fetch_add(1, Ordering::SeqCst);
                VectorSpace::new(
                    vocabulary(&["python"]),
                    vec![course("CS", "9", "Scripting", "python")],
                    vec![[1.].into()],
                )
            })
            .await
            .unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(engine.cached().await, 0);
        assert_eq!(engine.space().await.len(), 1);
        let recommendations = engine.recommend(&data_student(&[])).await.unwrap();
        assert_eq!(recommendations.len(), 1);
        assert_eq!(recommendations[0].course.code, "CS9");
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_current_state() {
        let engine = Config::default().build(sample_space());
        let before = engine.recommend(&data_student(&[])).await.unwrap();

        let result = engine
            .reload(|| {
                Err(LoadError::Io {
                    path: "vocabulary.json".into(),
                    source: io::ErrorKind::NotFound.into(),
                })
            })
            .await;

        assert!(matches!(result, Err(LoadError::Io { .. })));
        assert_eq!(engine.cached().await, 1);
        assert_eq!(engine.space().await.len(), sample_space().len());
        assert_eq!(engine.recommend(&data_student(&[])).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_cache_separates_career_goal_from_degree_program() {
        let space = VectorSpace::new(
            vocabulary(&["alpha", "beta", "gamma"]),
            vec![
                course("CS", "1", "Compilers", ""),
                course("CS", "2", "Networks", ""),
            ],
            vec![[1., 0., 1.].into(), [0., 1., 1.].into()],
        )
        .unwrap();
        let engine = Config::default().build(space);

        let mut first = student(
            Some("alpha-beta"),
            vec![taken("Swimming", "gamma", Some("A"))],
        );
        first.degree_program = "x".into();
        let mut second = first.clone();
        second.career_goal = Some("alpha".into());
        second.degree_program = "beta-x".into();

        let first_recommendations = engine.recommend(&first).await.unwrap();
        let second_recommendations = engine.recommend(&second).await.unwrap();

        assert_eq!(engine.cached().await, 2);
        assert_eq!(
            first_recommendations,
            engine.recommend_base(&first).await.unwrap(),
        );
        assert_eq!(
            second_recommendations,
            engine.recommend_base(&second).await.unwrap(),
        );
        assert_ne!(first_recommendations, second_recommendations);
    }
}
