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

//! Offline preparation of the catalog artifacts.

use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use displaydoc::Display;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    catalog::{read_json, ArtifactPaths, Course, LoadError, VectorSpace},
    vector::TermVector,
    vocabulary::Vocabulary,
};

#[derive(Debug, Display, Error)]
pub enum WriteError {
    /// Failed to write {path:?}: {source}
    Io { path: PathBuf, source: io::Error },
    /// Failed to serialize {path:?}: {source}
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Reads the raw catalog courses.
pub fn read_courses(path: impl AsRef<Path>) -> Result<Vec<Course>, LoadError> {
    read_json(path.as_ref())
}

/// Collects the vocabulary of all course descriptions.
pub fn build_vocabulary(courses: &[Course]) -> Vocabulary {
    Vocabulary::from_corpus(courses.iter().map(|course| course.description.as_str()))
}

/// Vectorizes each course description by its term frequencies.
pub fn build_vectors(vocabulary: &Vocabulary, courses: &[Course]) -> Vec<TermVector> {
    courses
        .iter()
        .map(|course| vocabulary.vectorize(&course.description))
        .collect()
}

/// The artifacts which define a [`VectorSpace`].
#[derive(Debug)]
pub struct Artifacts {
    pub vocabulary: Vocabulary,
    pub vectors: Vec<TermVector>,
    pub courses: Vec<Course>,
}

impl Artifacts {
    /// Builds the vocabulary and the vectors of the courses.
    #[instrument(skip_all, fields(courses = courses.len()))]
    pub fn build(courses: Vec<Course>) -> Self {
        let vocabulary = build_vocabulary(&courses);
        let vectors = build_vectors(&vocabulary, &courses);
        info!(vocabulary = vocabulary.len(), "built catalog artifacts");

        Self {
            vocabulary,
            vectors,
            courses,
        }
    }

    /// Writes the artifacts with their default file names into the directory.
    #[instrument(skip(self), err)]
    pub fn write(&self, dir: &Path) -> Result<ArtifactPaths, WriteError> {
        fs::create_dir_all(dir).map_err(|source| WriteError::Io {
            path: dir.into(),
            source,
        })?;
        let paths = ArtifactPaths::in_dir(dir);
        write_json(&paths.vocabulary, &self.vocabulary)?;
        write_json(&paths.vectors, &self.vectors)?;
        write_json(&paths.courses, &self.courses)?;

        Ok(paths)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::of(&self.courses)
    }

    /// Validates the artifacts as a vector space.
    pub fn into_space(self) -> Result<VectorSpace, LoadError> {
        VectorSpace::new(self.vocabulary, self.courses, self.vectors)
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<(), WriteError> {
    let io_error = |source: io::Error| WriteError::Io {
        path: path.into(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_json::to_writer(&mut writer, value).map_err(|source| WriteError::Json {
        path: path.into(),
        source,
    })?;
    writer.flush().map_err(io_error)
}

/// Counts of a course catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub courses: usize,
    pub unique_subjects: usize,
    pub unique_courses: usize,
}

impl CatalogStats {
    pub fn of(courses: &[Course]) -> Self {
        let subjects = courses
            .iter()
            .map(|course| course.subject.as_str())
            .collect::<HashSet<_>>();
        let codes = courses
            .iter()
            .map(|course| course.code.as_str())
            .collect::<HashSet<_>>();

        Self {
            courses: courses.len(),
            unique_subjects: subjects.len(),
            unique_courses: codes.len(),
        }
    }
}
