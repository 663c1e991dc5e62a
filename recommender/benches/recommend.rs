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

use std::hint::black_box;

use criterion::{criterion_group, Criterion};
use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use xayn_ai_recommender::{
    prepare::Artifacts,
    recommend_base,
    Config,
    Course,
    CourseTaken,
    StudentRecord,
    VectorSpace,
};

const WORDS: [&str; 24] = [
    "algebra", "analysis", "biology", "cells", "chemistry", "data", "databases", "design",
    "ecology", "economics", "graphs", "history", "learning", "literature", "machine", "markets",
    "networks", "physics", "programming", "python", "sql", "statistics", "systems", "writing",
];

fn description(words: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..words)
        .filter_map(|_| WORDS.choose(&mut rng))
        .join(" ")
}

fn create_space(courses: usize) -> VectorSpace {
    let mut rng = rand::thread_rng();
    let courses = (0..courses)
        .map(|index| Course {
            subject: WORDS[index % WORDS.len()].to_uppercase(),
            number: index.to_string(),
            code: format!("C{index}"),
            title: format!("Course {index} {}", description(2)),
            description: description(rng.gen_range(10..60)),
        })
        .collect();
    Artifacts::build(courses).into_space().unwrap()
}

fn create_student(taken: usize) -> StudentRecord {
    StudentRecord {
        career_goal: Some("data scientist in machine learning".into()),
        degree_program: "Computer Science".into(),
        calculate_by_learning_gap: true,
        courses_taken: (0..taken)
            .map(|index| CourseTaken {
                subject: "CS".into(),
                number: index.to_string(),
                code: format!("CS{index}"),
                title: format!("Taken {index}"),
                description: description(30),
                grade: Some(["A", "B+", "C", "F"][index % 4].into()),
            })
            .collect(),
        allowed_subjects: Vec::new(),
    }
}

fn bench_recommend_base(c: &mut Criterion) {
    let config = Config::default();
    let student = create_student(8);

    for courses in [100, 1000, 5000] {
        let space = create_space(courses);
        c.bench_function(&format!("recommend_base_c{courses}"), |b| {
            b.iter(|| {
                black_box(recommend_base(
                    black_box(&space),
                    black_box(&student),
                    black_box(&config),
                ))
            })
        });
    }
}

fn bench_score(c: &mut Criterion) {
    let space = create_space(5000);
    let query = space.vectorize(&description(200));

    c.bench_function("score_c5000", |b| {
        b.iter(|| black_box(space.score(black_box(&query))))
    });
}

criterion_group!(b_recommend_base, bench_recommend_base);
criterion_group!(b_score, bench_score);

fn main() {
    criterion::Criterion::default()
        .configure_from_args()
        .final_summary();

    b_recommend_base();
    b_score();
}
