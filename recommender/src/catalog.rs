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

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    sync::Arc,
};

use displaydoc::Display;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    similarity::{self, DimensionMismatch},
    vector::TermVector,
    vocabulary::{InvalidVocabulary, Vocabulary},
};

pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const VECTORS_FILE: &str = "vectors.json";
pub const COURSES_FILE: &str = "courses.json";

/// A course of the catalog.
///
/// The serde field names are the ones of the catalog files and of the public api.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Course {
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Number")]
    pub number: String,
    #[serde(rename = "Course")]
    pub code: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(
        rename = "Description",
        default,
        deserialize_with = "deserialize_null_as_empty"
    )]
    pub description: String,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Display, Error)]
pub enum LoadError {
    /// Failed to read {path:?}: {source}
    Io { path: PathBuf, source: io::Error },
    /// Failed to parse {path:?}: {source}
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Invalid vocabulary: {0}
    Vocabulary(#[from] InvalidVocabulary),
    /// The catalog has {courses} courses but {vectors} vectors
    MisalignedCatalog { courses: usize, vectors: usize },
    /// Vector {index} has {actual} dimensions but the vocabulary has {expected} tokens
    VectorLength {
        index: usize,
        expected: usize,
        actual: usize,
    },
    /// Vector {index} contains negative or non-finite values
    InvalidValue { index: usize },
}

/// Locations of the artifacts produced by the catalog preparation.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ArtifactPaths {
    pub vocabulary: PathBuf,
    pub vectors: PathBuf,
    pub courses: PathBuf,
}

impl ArtifactPaths {
    /// The default artifact file names inside of a directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vocabulary: dir.join(VOCABULARY_FILE),
            vectors: dir.join(VECTORS_FILE),
            courses: dir.join(COURSES_FILE),
        }
    }
}

pub(crate) fn read_json<T>(path: &Path) -> Result<T, LoadError>
where
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.into(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
        path: path.into(),
        source,
    })
}

/// The vocabulary together with the catalog courses and their term vectors.
///
/// Course `i` is described by vector `i` and every vector spans the vocabulary. The space is
/// immutable, a changed catalog requires a new space.
#[derive(Debug)]
pub struct VectorSpace {
    vocabulary: Vocabulary,
    courses: Vec<Arc<Course>>,
    vectors: Vec<TermVector>,
}

impl VectorSpace {
    /// Creates a vector space from aligned courses and vectors.
    pub fn new(
        vocabulary: Vocabulary,
        courses: Vec<Course>,
        vectors: Vec<TermVector>,
    ) -> Result<Self, LoadError> {
        if courses.len() != vectors.len() {
            return Err(LoadError::MisalignedCatalog {
                courses: courses.len(),
                vectors: vectors.len(),
            });
        }
        for (index, vector) in vectors.iter().enumerate() {
            if vector.len() != vocabulary.len() {
                return Err(LoadError::VectorLength {
                    index,
                    expected: vocabulary.len(),
                    actual: vector.len(),
                });
            }
            if !vector
                .iter()
                .all(|value| value.is_finite() && *value >= 0.)
            {
                return Err(LoadError::InvalidValue { index });
            }
        }

        Ok(Self {
            vocabulary,
            courses: courses.into_iter().map(Arc::new).collect(),
            vectors,
        })
    }

    /// Loads and validates the artifacts.
    #[instrument(err)]
    pub fn load(paths: &ArtifactPaths) -> Result<Self, LoadError> {
        let vocabulary = read_json::<Vocabulary>(&paths.vocabulary)?;
        let vectors = read_json::<Vec<TermVector>>(&paths.vectors)?;
        let courses = read_json::<Vec<Course>>(&paths.courses)?;
        let space = Self::new(vocabulary, courses, vectors)?;
        info!(
            vocabulary = space.vocabulary.len(),
            courses = space.courses.len(),
            "loaded vector space",
        );

        Ok(space)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn courses(&self) -> &[Arc<Course>] {
        &self.courses
    }

    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }

    /// The number of catalog courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Vectorizes the text over the vocabulary of this space.
    pub fn vectorize(&self, text: &str) -> TermVector {
        self.vocabulary.vectorize(text)
    }

    /// Scores the query against all catalog vectors, in catalog order.
    pub fn score(&self, query: &TermVector) -> Result<Vec<f32>, DimensionMismatch> {
        similarity::score(query, &self.vectors)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::fs;

    use xayn_test_utils::temp::TempDir;

    use super::*;

    pub(crate) fn course(subject: &str, number: &str, title: &str, description: &str) -> Course {
        Course {
            subject: subject.into(),
            number: number.into(),
            code: format!("{subject}{number}"),
            title: title.into(),
            description: description.into(),
        }
    }

    pub(crate) fn vocabulary(tokens: &[&str]) -> Vocabulary {
        Vocabulary::new(tokens.iter().map(ToString::to_string).collect()).unwrap()
    }

    #[test]
    fn test_new_validates_alignment() {
        let courses = vec![course("CS", "1", "A", ""), course("CS", "2", "B", "")];

        assert!(matches!(
            VectorSpace::new(
                vocabulary(&["a", "b"]),
                courses.clone(),
                vec![[1., 0.].into()],
            ),
            Err(LoadError::MisalignedCatalog {
                courses: 2,
                vectors: 1,
            }),
        ));
        assert!(matches!(
            VectorSpace::new(
                vocabulary(&["a", "b"]),
                courses.clone(),
                vec![[1., 0.].into(), [1., 0., 0.].into()],
            ),
            Err(LoadError::VectorLength {
                index: 1,
                expected: 2,
                actual: 3,
            }),
        ));
        assert!(matches!(
            VectorSpace::new(
                vocabulary(&["a", "b"]),
                courses.clone(),
                vec![[1., f32::NAN].into(), [1., 0.].into()],
            ),
            Err(LoadError::InvalidValue { index: 0 }),
        ));
        assert!(matches!(
            VectorSpace::new(
                vocabulary(&["a", "b"]),
                courses.clone(),
                vec![[1., 0.].into(), [-1., 0.].into()],
            ),
            Err(LoadError::InvalidValue { index: 1 }),
        ));

        let space = VectorSpace::new(
            vocabulary(&["a", "b"]),
            courses,
            vec![[1., 0.].into(), [0., 2.].into()],
        )
        .unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.courses()[1].code, "CS2");
    }

    #[test]
    fn test_course_serde_names() {
        let course: Course = serde_json::from_str(
            r#"{"Subject":"SWE","Number":"3313","Course":"SWE3313","Title":"Intro","Description":null}"#,
        )
        .unwrap();
        assert_eq!(course.code, "SWE3313");
        assert_eq!(course.description, "");

        let course: Course = serde_json::from_str(
            r#"{"Subject":"SWE","Number":"3313","Course":"SWE3313","Title":"Intro"}"#,
        )
        .unwrap();
        assert_eq!(course.description, "");
    }

    #[test]
    fn test_load() {
        let dir = TempDir::new("xayn-catalog-load").unwrap();
        let paths = ArtifactPaths::in_dir(&dir);
        fs::write(&paths.vocabulary, r#"["word1","word2","word3"]"#).unwrap();
        fs::write(&paths.vectors, "[[1,0,2],[2,1,0]]").unwrap();
        fs::write(
            &paths.courses,
            serde_json::to_string(&[
                course("CS", "1", "One", "word1 word3 word3"),
                course("CS", "2", "Two", "word1 word1 word2"),
            ])
            .unwrap(),
        )
        .unwrap();

        let space = VectorSpace::load(&paths).unwrap();
        assert_eq!(space.vocabulary().len(), 3);
        assert_eq!(space.vectors().len(), 2);
        assert_eq!(space.vectorize("word1 word3 word3"), space.vectors()[0]);

        fs::write(&paths.vectors, "[[1,0,2]]").unwrap();
        assert!(matches!(
            VectorSpace::load(&paths),
            Err(LoadError::MisalignedCatalog { .. }),
        ));

        fs::remove_file(&paths.vocabulary).unwrap();
        assert!(matches!(
            VectorSpace::load(&paths),
            Err(LoadError::Io { .. }),
        ));

        fs::write(&paths.vocabulary, "{").unwrap();
        assert!(matches!(
            VectorSpace::load(&paths),
            Err(LoadError::Json { .. }),
        ));
    }
}
