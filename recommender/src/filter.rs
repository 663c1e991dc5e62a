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

use strsim::jaro_winkler;

use crate::{pipeline::ScoredCourse, profile::CourseTaken};

/// Checks if the title is a near duplicate of the title of any course taken.
///
/// Titles are compared by their Jaro-Winkler similarity which has to be strictly above the
/// threshold.
pub fn is_course_similar(title: &str, courses_taken: &[CourseTaken], threshold: f32) -> bool {
    let threshold = f64::from(threshold);
    courses_taken
        .iter()
        .any(|taken| jaro_winkler(title, &taken.title) > threshold)
}

/// Keeps only the courses of the allowed subjects.
///
/// No allowed subjects means no restriction.
pub fn filter_by_allowed_subjects(
    courses: &[ScoredCourse],
    allowed_subjects: &[String],
) -> Vec<ScoredCourse> {
    if allowed_subjects.is_empty() {
        return courses.to_vec();
    }

    courses
        .iter()
        .filter(|scored| allowed_subjects.contains(&scored.course.subject))
        .cloned()
        .collect()
}
