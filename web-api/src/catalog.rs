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

use serde::{Deserialize, Serialize};
use xayn_ai_recommender::{ArtifactPaths, COURSES_FILE, VECTORS_FILE, VOCABULARY_FILE};

use crate::utils::RelativePathBuf;

/// Locations of the prepared catalog artifacts.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) vocabulary: RelativePathBuf,
    pub(crate) vectors: RelativePathBuf,
    pub(crate) courses: RelativePathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vocabulary: format!("assets/catalog/{VOCABULARY_FILE}").as_str().into(),
            vectors: format!("assets/catalog/{VECTORS_FILE}").as_str().into(),
            courses: format!("assets/catalog/{COURSES_FILE}").as_str().into(),
        }
    }
}

impl Config {
    pub(crate) fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            vocabulary: self.vocabulary.relative(),
            vectors: self.vectors.relative(),
            courses: self.courses.relative(),
        }
    }
}
