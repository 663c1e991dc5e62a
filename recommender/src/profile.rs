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

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};

/// A course the student already took.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct CourseTaken {
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
    #[serde(rename = "Grade", default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// The academic profile of a student.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    #[serde(rename = "Career goal", default)]
    pub career_goal: Option<String>,
    #[serde(rename = "Degree program")]
    pub degree_program: String,
    #[serde(rename = "CalculateByLearningGap")]
    pub calculate_by_learning_gap: bool,
    #[serde(rename = "Courses taken", default)]
    pub courses_taken: Vec<CourseTaken>,
    #[serde(rename = "Allowed subject", default)]
    pub allowed_subjects: Vec<String>,
}

impl StudentRecord {
    /// The career goal if it isn't blank.
    pub fn career_goal(&self) -> Option<&str> {
        self.career_goal
            .as_deref()
            .filter(|goal| !goal.trim().is_empty())
    }

    pub fn weighting(&self) -> Weighting {
        if self.calculate_by_learning_gap {
            Weighting::LearningGap
        } else {
            Weighting::Strength
        }
    }
}

const GRADES: [&str; 13] = [
    "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
];

const LEARNING_GAP_WEIGHTS: [f32; 13] = [
    1.0, 1.25, 1.5, 1.75, 2.0, 2.25, 3.0, 3.75, 4.0, 4.25, 4.5, 4.75, 5.0,
];

const STRENGTH_WEIGHTS: [f32; 13] = [
    5.0, 4.75, 4.5, 4.25, 4.0, 3.75, 3.0, 2.25, 2.0, 1.75, 1.5, 1.25, 1.0,
];

/// The weight of courses with a missing or unknown grade.
pub const DEFAULT_GRADE_WEIGHT: f32 = 1.0;

/// How grades translate into the influence of a course on the profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weighting {
    /// Lower grades weigh more, steering towards the weak areas.
    LearningGap,
    /// Higher grades weigh more, steering towards the strong areas.
    Strength,
}

impl Weighting {
    /// Looks up the weight of a grade, this is total over all inputs.
    pub fn grade_weight(self, grade: Option<&str>) -> f32 {
        let Some(rank) = grade.and_then(|grade| GRADES.iter().position(|&known| known == grade))
        else {
            return DEFAULT_GRADE_WEIGHT;
        };

        match self {
            Self::LearningGap => LEARNING_GAP_WEIGHTS[rank],
            Self::Strength => STRENGTH_WEIGHTS[rank],
        }
    }
}

/// The number of times a description is repeated for the given weight.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn repeat_times(weight: f32, repetition_multiplier: f32) -> usize {
    (weight * repetition_multiplier).round().max(0.) as usize
}

/// Builds a synthetic profile text from the history of the student.
///
/// Each trimmed description is repeated according to the weight of its grade, the courses are
/// joined in their given order. A student without history has an empty profile.
pub fn build_weighted_description(record: &StudentRecord, repetition_multiplier: f32) -> String {
    let weighting = record.weighting();
    record
        .courses_taken
        .iter()
        .map(|course| {
            let weight = weighting.grade_weight(course.grade.as_deref());
            iter::repeat(course.description.trim())
                .take(repeat_times(weight, repetition_multiplier))
                .join(" ")
        })
        .join(" ")
        .trim()
        .to_owned()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const MULTIPLIER: f32 = 10.;

    pub(crate) fn taken(title: &str, description: &str, grade: Option<&str>) -> CourseTaken {
        CourseTaken {
            subject: "SWE".into(),
            number: "1000".into(),
            code: format!("SWE{}", title.len()),
            title: title.into(),
            description: description.into(),
            grade: grade.map(Into::into),
        }
    }

    fn record(learning_gap: bool, courses: Vec<CourseTaken>) -> StudentRecord {
        StudentRecord {
            career_goal: None,
            degree_program: "Software Engineering".into(),
            calculate_by_learning_gap: learning_gap,
            courses_taken: courses,
            allowed_subjects: Vec::new(),
        }
    }

    fn repetitions(description: &str) -> usize {
        description.matches("alpha").count()
    }

    #[test]
    fn test_grade_tables_are_mirrored() {
        for (grade, weight) in GRADES.into_iter().zip(LEARNING_GAP_WEIGHTS) {
            assert_eq!(Weighting::LearningGap.grade_weight(Some(grade)), weight);
        }
        assert_eq!(Weighting::LearningGap.grade_weight(Some("F")), 5.);
        assert_eq!(Weighting::Strength.grade_weight(Some("A+")), 5.);
        assert_eq!(Weighting::Strength.grade_weight(Some("F")), 1.);
        assert_eq!(Weighting::Strength.grade_weight(Some("C")), 2.25);
    }

    #[test]
    fn test_unknown_grades_use_default_weight() {
        for weighting in [Weighting::LearningGap, Weighting::Strength] {
            assert_eq!(weighting.grade_weight(None), DEFAULT_GRADE_WEIGHT);
            assert_eq!(weighting.grade_weight(Some("")), DEFAULT_GRADE_WEIGHT);
            assert_eq!(weighting.grade_weight(Some("Z")), DEFAULT_GRADE_WEIGHT);
            assert_eq!(weighting.grade_weight(Some("a+")), DEFAULT_GRADE_WEIGHT);
        }
    }

    #[test]
    fn test_empty_history_gives_empty_description() {
        assert_eq!(build_weighted_description(&record(true, vec![]), MULTIPLIER), "");
        assert_eq!(build_weighted_description(&record(false, vec![]), MULTIPLIER), "");
    }

    #[test]
    fn test_learning_gap_repetitions() {
        let description = build_weighted_description(
            &record(true, vec![taken("T", "alpha", Some("A+"))]),
            MULTIPLIER,
        );
        assert_eq!(description, vec!["alpha"; 10].join(" "));

        // 1.25 * 10 rounds half away from zero
        let description = build_weighted_description(
            &record(true, vec![taken("T", "alpha", Some("A"))]),
            MULTIPLIER,
        );
        assert_eq!(repetitions(&description), 13);

        let description = build_weighted_description(
            &record(true, vec![taken("T", "alpha", Some("F"))]),
            MULTIPLIER,
        );
        assert_eq!(repetitions(&description), 50);
    }

    #[test]
    fn test_unknown_grade_collapses_onto_default_repetitions() {
        for grade in [Some("Z"), None] {
            let description = build_weighted_description(
                &record(true, vec![taken("T", "alpha", grade)]),
                MULTIPLIER,
            );
            assert_eq!(repetitions(&description), 10);
        }
    }

    #[test]
    fn test_strength_repetitions() {
        let description = build_weighted_description(
            &record(false, vec![taken("T", "alpha", Some("A+"))]),
            MULTIPLIER,
        );
        assert_eq!(repetitions(&description), 50);
        let description = build_weighted_description(
            &record(false, vec![taken("T", "alpha", Some("C"))]),
            MULTIPLIER,
        );
        assert_eq!(repetitions(&description), 23);
    }

    #[test]
    fn test_descriptions_are_trimmed_and_kept_in_order() {
        let description = build_weighted_description(
            &record(
                true,
                vec![
                    taken("T1", "  first course  ", Some("A+")),
                    taken("T2", "second", Some("A+")),
                ],
            ),
            1.,
        );
        assert_eq!(description, "first course second");
    }

    #[test]
    fn test_missing_descriptions_contribute_nothing() {
        let description = build_weighted_description(
            &record(true, vec![taken("T1", "", Some("A")), taken("T2", "  ", None)]),
            MULTIPLIER,
        );
        assert_eq!(description, "");
    }

    #[test]
    fn test_length_is_monotonic_in_weight() {
        for weighting in [true, false] {
            let mut weighted = GRADES
                .into_iter()
                .map(|grade| {
                    let record = record(weighting, vec![taken("T", "alpha beta", Some(grade))]);
                    (
                        record.weighting().grade_weight(Some(grade)),
                        build_weighted_description(&record, MULTIPLIER).len(),
                    )
                })
                .collect::<Vec<_>>();
            weighted.sort_by(|(a, _), (b, _)| a.total_cmp(b));
            assert!(weighted.windows(2).all(|pair| pair[0].1 <= pair[1].1));
        }
    }

    #[test]
    fn test_blank_career_goal_is_none() {
        let mut record = record(true, vec![]);
        assert_eq!(record.career_goal(), None);
        record.career_goal = Some("  \t".into());
        assert_eq!(record.career_goal(), None);
        record.career_goal = Some("Frontend Developer".into());
        assert_eq!(record.career_goal(), Some("Frontend Developer"));
    }

    #[test]
    fn test_record_serde_names() {
        let record: StudentRecord = serde_json::from_str(
            r#"{
                "Career goal": "Frontend Developer",
                "Degree program": "Software Engineer",
                "CalculateByLearningGap": false,
                "Allowed subject": ["SWE", "CS"],
                "Courses taken": [{
                    "Subject": "SWE",
                    "Number": "3313",
                    "Course": "SWE3313",
                    "Title": "Introduction to Software Engineering",
                    "Description": "An overview.",
                    "Grade": "A+"
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(record.weighting(), Weighting::Strength);
        assert_eq!(record.allowed_subjects, ["SWE", "CS"]);
        assert_eq!(record.courses_taken[0].code, "SWE3313");
        assert_eq!(record.courses_taken[0].grade.as_deref(), Some("A+"));
    }
}
