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

//! A small course catalog in the format of the catalog files.

/// Sample catalog courses as json array of `{Subject, Number, Course, Title, Description}`.
pub const SAMPLE_COURSES: &str = r#"[
    {
        "Subject": "CS",
        "Number": "1010",
        "Course": "CS1010",
        "Title": "Intro to Programming",
        "Description": "Programming in Python with variables, loops, functions and basic data structures."
    },
    {
        "Subject": "CS",
        "Number": "2010",
        "Course": "CS2010",
        "Title": "Data Structures",
        "Description": "Lists, stacks, queues, trees, graphs and hash tables implemented in Python with algorithm analysis."
    },
    {
        "Subject": "CS",
        "Number": "3050",
        "Course": "CS3050",
        "Title": "Algorithms",
        "Description": "Design and analysis of algorithms including sorting, graphs, dynamic programming and complexity."
    },
    {
        "Subject": "CS",
        "Number": "3500",
        "Course": "CS3500",
        "Title": "Database Systems",
        "Description": "Relational databases, SQL queries, normalization, transactions and indexing."
    },
    {
        "Subject": "CS",
        "Number": "4200",
        "Course": "CS4200",
        "Title": "Machine Learning",
        "Description": "Supervised and unsupervised machine learning with regression, classification, neural networks and Python."
    },
    {
        "Subject": "MATH",
        "Number": "1210",
        "Course": "MATH1210",
        "Title": "Calculus I",
        "Description": "Limits, derivatives and integrals of functions of one variable with applications."
    },
    {
        "Subject": "MATH",
        "Number": "1220",
        "Course": "MATH1220",
        "Title": "Calculus II",
        "Description": "Techniques of integration, sequences and series with applications."
    },
    {
        "Subject": "MATH",
        "Number": "2270",
        "Course": "MATH2270",
        "Title": "Linear Algebra",
        "Description": "Vectors, matrices, linear transformations and eigenvalues with applications in machine learning."
    },
    {
        "Subject": "MATH",
        "Number": "3070",
        "Course": "MATH3070",
        "Title": "Probability and Statistics",
        "Description": "Probability distributions, statistical inference, regression and data analysis."
    },
    {
        "Subject": "BIOL",
        "Number": "1610",
        "Course": "BIOL1610",
        "Title": "General Biology",
        "Description": "Cells, genetics, evolution and ecology with laboratory work."
    },
    {
        "Subject": "ENGL",
        "Number": "2010",
        "Course": "ENGL2010",
        "Title": "Technical Writing",
        "Description": null
    }
]"#;

/// The number of courses in [`SAMPLE_COURSES`].
pub const SAMPLE_COURSES_LEN: usize = 11;

/// The distinct subjects of [`SAMPLE_COURSES`].
pub const SAMPLE_SUBJECTS: [&str; 4] = ["BIOL", "CS", "ENGL", "MATH"];
