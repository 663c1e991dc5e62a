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
use serde_json::Value;
use xayn_ai_recommender::{CourseTaken, ScoredCourse, StudentRecord};

use crate::error::common::BadRequest;

/// A student record as sent by clients.
///
/// The fields are kept as raw json so that invalid records are answered with a precise message.
#[derive(Debug, Deserialize)]
pub(crate) struct UnvalidatedStudentRecord {
    #[serde(rename = "Career goal", default)]
    career_goal: Value,
    #[serde(rename = "Degree program", default)]
    degree_program: Value,
    #[serde(rename = "CalculateByLearningGap", default)]
    calculate_by_learning_gap: Value,
    #[serde(rename = "Courses taken", default)]
    courses_taken: Value,
    #[serde(rename = "Allowed subject", default)]
    allowed_subjects: Value,
}

impl UnvalidatedStudentRecord {
    pub(crate) fn validate(self) -> Result<StudentRecord, BadRequest> {
        let career_goal = match self.career_goal {
            Value::Null => None,
            Value::String(career_goal) => Some(career_goal),
            _ => return Err("Career goal must be a string.".into()),
        };

        let degree_program = match self.degree_program {
            Value::String(degree_program) if !degree_program.trim().is_empty() => degree_program,
            _ => return Err("Degree program is required and must be a string.".into()),
        };

        let Value::Bool(calculate_by_learning_gap) = self.calculate_by_learning_gap else {
            return Err("CalculateByLearningGap is required and must be a boolean.".into());
        };

        let courses_taken = match self.courses_taken {
            Value::Array(courses) if !courses.is_empty() => courses
                .into_iter()
                .map(validate_course_taken)
                .collect::<Option<Vec<_>>>(),
            _ => None,
        }
        .ok_or(
            "Courses taken is required and must be a non-empty array of objects with specific string properties.",
        )?;

        let allowed_subjects = match self.allowed_subjects {
            Value::Array(subjects) => subjects
                .into_iter()
                .map(|subject| match subject {
                    Value::String(subject) => Some(subject),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>(),
            _ => None,
        }
        .ok_or("Allowed subject must be an array of strings.")?;

        Ok(StudentRecord {
            career_goal,
            degree_program,
            calculate_by_learning_gap,
            courses_taken,
            allowed_subjects,
        })
    }
}

fn validate_course_taken(course: Value) -> Option<CourseTaken> {
    let Value::Object(mut course) = course else {
        return None;
    };
    let mut field = |name: &str| match course.remove(name) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    };

    Some(CourseTaken {
        subject: field("Subject")?,
        number: field("Number")?,
        code: field("Course")?,
        title: field("Title")?,
        description: field("Description")?,
        grade: Some(field("Grade")?),
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendationsResponse {
    pub(crate) recommendations: Vec<ScoredCourse>,
}
