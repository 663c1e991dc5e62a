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

//! Course recommendations from the history of a student.
//!
//! The taken courses are turned into a weighted description which is compared to the term vectors
//! of the course catalog by cosine similarity, optionally blended with a career goal.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]
#![deny(
    clippy::pedantic,
    noop_method_call,
    rust_2018_idioms,
    unused_qualifications,
    unsafe_op_in_unsafe_fn
)]
#![warn(unreachable_pub, rustdoc::missing_crate_level_docs)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod cache;
mod career;
mod catalog;
mod config;
mod engine;
mod filter;
mod fingerprint;
mod pipeline;
pub mod prepare;
mod profile;
mod similarity;
mod utils;
mod vector;
mod vocabulary;

pub use crate::{
    career::adjust_for_career_goal,
    catalog::{
        ArtifactPaths,
        Course,
        LoadError,
        VectorSpace,
        COURSES_FILE,
        VECTORS_FILE,
        VOCABULARY_FILE,
    },
    config::{Config, Error as ConfigError},
    engine::Engine,
    filter::{filter_by_allowed_subjects, is_course_similar},
    fingerprint::{generate_fingerprint, Fingerprint},
    pipeline::{recommend_base, ScoredCourse},
    profile::{
        build_weighted_description,
        CourseTaken,
        StudentRecord,
        Weighting,
        DEFAULT_GRADE_WEIGHT,
    },
    similarity::{cosine_similarity, score, DimensionMismatch},
    vector::TermVector,
    vocabulary::{tokenize, InvalidVocabulary, Vocabulary},
};
