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

//! Administrative tasks around the course catalog.

use std::{fmt::Write, path::PathBuf};

use clap::{Parser, Subcommand};
use rand::{rngs::OsRng, RngCore};
use tracing::{info, instrument};
use xayn_ai_recommender::prepare::{read_courses, Artifacts, CatalogStats};
use xayn_web_api::logging;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Builds the vocabulary, vectors and course artifacts from a course catalog.
    Prepare {
        /// Json file with the courses of the catalog.
        #[arg(long)]
        courses: PathBuf,

        /// Directory the artifacts are written to.
        #[arg(long)]
        out: PathBuf,
    },
    /// Prints the counts of a course catalog.
    Stats {
        /// Json file with the courses of the catalog.
        #[arg(long)]
        courses: PathBuf,
    },
    /// Prints a new random api key.
    GenerateApiKey {
        /// Number of random bytes, the key has twice as many hex digits.
        #[arg(long, default_value_t = 32)]
        bytes: usize,
    },
}

fn main() -> Result<(), anyhow::Error> {
    logging::initialize_global(&logging::Config::default())?;
    match Args::parse().command {
        Command::Prepare { courses, out } => prepare(courses, out),
        Command::Stats { courses } => stats(courses),
        Command::GenerateApiKey { bytes } => {
            println!("{}", generate_api_key(bytes));
            Ok(())
        }
    }
}

#[instrument(err)]
fn prepare(courses: PathBuf, out: PathBuf) -> Result<(), anyhow::Error> {
    let courses = read_courses(&courses)?;
    let artifacts = Artifacts::build(courses);
    let stats = artifacts.stats();
    let paths = artifacts.write(&out)?;
    info!(
        vocabulary = artifacts.vocabulary.len(),
        courses = stats.courses,
        unique_subjects = stats.unique_subjects,
        unique_courses = stats.unique_courses,
        ?paths,
        "prepared the catalog artifacts",
    );
    Ok(())
}

#[instrument(err)]
fn stats(courses: PathBuf) -> Result<(), anyhow::Error> {
    let stats = CatalogStats::of(&read_courses(&courses)?);
    info!(?stats, "catalog statistics");
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn generate_api_key(bytes: usize) -> String {
    let mut key = vec![0; bytes];
    OsRng.fill_bytes(&mut key);
    key.iter().fold(String::with_capacity(2 * bytes), |mut hex, byte| {
        // writing to a string never fails
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}
