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

//! Provide various utilities for writing integration tests of the web api.
//!
//! As this is for testing many of the functions here will panic on failure instead
//! propagating an error and then panicking. We still use the `Panic` error type to
//! make it easier to change error handling in the future.

use std::{
    env,
    future::Future,
    path::Path,
    sync::{Arc, Once},
    time::Duration,
};

use derive_more::{AsRef, Display};
use once_cell::sync::Lazy;
use rand::random;
use reqwest::{Client, Request, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value as JsonValue};
use toml::{toml, Table, Value};
use tracing::{dispatcher, error_span, Dispatch, Instrument};
use tracing_subscriber::fmt::TestWriter;
use xayn_ai_recommender::{prepare::Artifacts, ArtifactPaths, Course};
use xayn_test_utils::{catalog::SAMPLE_COURSES, error::Panic, temp::TempDir};
use xayn_web_api::{config, start, AppHandle};

pub async fn send_assert(client: &Client, req: Request, expected: StatusCode) -> Response {
    let method = req.method().clone();
    let target = req.url().clone();
    let response = client.execute(req).await.unwrap();
    let status = response.status();
    if status != expected {
        let bytes = response.bytes().await.unwrap();
        let text = String::from_utf8_lossy(&bytes);
        panic!(
            "Failed to {method} {target}, status `{status}` instead of `{expected}`.\nBody: `{text}`\n"
        );
    }
    response
}

pub async fn send_assert_json<O>(client: &Client, req: Request, expected: StatusCode) -> O
where
    O: DeserializeOwned,
{
    let method = req.method().clone();
    let target = req.url().clone();
    let response = send_assert(client, req, expected).await;
    let bytes = response.bytes().await.unwrap();
    match serde_json::from_slice::<O>(&bytes) {
        Ok(out) => out,
        Err(err) => {
            let text = String::from_utf8_lossy(&bytes);
            panic!("Failed to decode body of {method} {target}, error: {err}\nbody: {text}")
        }
    }
}

/// Initializes fallback logging.
///
/// This only exist to make sure all logs are always logged
/// even if there is an accident and the global dispatch is
/// used instead of the per-test dispatch.
///
/// There are a small number of logs where this is always the
/// case, like when actix logs that it started a new worker thread.
pub fn initialize_test_logging_fallback() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let var = env::var_os("XAYN_TEST_FALLBACK_LOG");
        let directives = var
            .as_deref()
            .map(|s| {
                s.to_str()
                    .expect("XAYN_TEST_FALLBACK_LOG must only contain utf-8")
            })
            .unwrap_or("warn");
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(TestWriter::default())
            .with_env_filter(directives)
            .init();
    });
}

static LOG_ENV_FILTER: Lazy<String> = Lazy::new(|| {
    env::var_os("XAYN_TEST_LOG")
        .map(|s| {
            s.to_str()
                .expect("XAYN_TEST_LOG must only contain utf-8")
                .into()
        })
        .unwrap_or_else(|| "info,actix_server=warn".into())
});

pub fn initialize_local_test_logging(_test_id: &TestId) -> Dispatch {
    initialize_test_logging_fallback();
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(TestWriter::default())
        .with_env_filter(LOG_ENV_FILTER.as_str())
        .finish()
        .into()
}

pub fn run_async_with_test_logger<F>(test_id: &TestId, body: F) -> F::Output
where
    F: Future,
{
    let subscriber = initialize_local_test_logging(test_id);

    dispatcher::with_default(&subscriber, || {
        let body = body.instrument(error_span!(parent: None, "test", %test_id));

        // more or less what #[tokio::test] does
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed building the Runtime")
            .block_on(body)
    })
}

/// Wrapper around integration test code which makes sure they run in a semi-isolated context.
///
/// For each test:
///
/// - the sample catalog is prepared into a fresh temporary directory
/// - a server is started on its own port, the config is pre-populated with the catalog paths
///   - you can update it using the `configure` table
/// - the test context including an url to the server is passed to the test
pub fn test_app<F>(
    configure: Option<Table>,
    test: impl FnOnce(Arc<Client>, Arc<Url>, Arc<TestContext>) -> F,
) where
    F: Future<Output = Result<(), Panic>>,
{
    let test_id = &TestId::generate();
    run_async_with_test_logger(test_id, async {
        let context = Arc::new(TestContext::create(test_id.clone()).unwrap());
        let handle = start_test_application(&context, configure.unwrap_or_default()).await;

        test(build_client(), Arc::new(handle.url()), context)
            .await
            .unwrap();

        handle.stop_and_wait().await.unwrap();
    });
}

fn build_client() -> Arc<Client> {
    Arc::new(
        Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap(),
    )
}

pub const UNCHANGED_CONFIG: Option<Table> = None;

pub fn extend_config(current: &mut Table, extension: Table) {
    for (key, value) in extension {
        if let Some(current) = current.get_mut(&key) {
            match (current, value) {
                (Value::Table(current), Value::Table(value)) => extend_config(current, value),
                (current, value) => *current = value,
            }
        } else {
            current.insert(key, value);
        }
    }
}

pub async fn start_test_application(context: &TestContext, configure: Table) -> AppHandle {
    let config = build_test_config_from_parts(&context.paths, configure);

    let args = &[
        "integration-test",
        "--bind-to",
        "127.0.0.1:0",
        "--config",
        &format!("inline:{config}"),
    ];

    let config = config::load_with_args([""; 0], args);

    start(config)
        .instrument(error_span!("test", test_id = %context.test_id))
        .await
        .unwrap()
}

pub fn build_test_config_from_parts(paths: &ArtifactPaths, configure: Table) -> Table {
    let vocabulary = path_to_str(&paths.vocabulary);
    let vectors = path_to_str(&paths.vectors);
    let courses = path_to_str(&paths.courses);

    let mut config = toml! {
        [catalog]
        vocabulary = vocabulary
        vectors = vectors
        courses = courses
    };

    extend_config(&mut config, configure);

    config
}

fn path_to_str(path: &Path) -> &str {
    path.to_str().expect("temporary paths must be utf-8")
}

/// Prepares the catalog artifacts of the given courses into the directory.
pub fn write_catalog(courses: Vec<Course>, dir: &Path) -> Result<ArtifactPaths, Panic> {
    Ok(Artifacts::build(courses).write(dir)?)
}

/// The courses of the sample catalog.
pub fn sample_courses() -> Vec<Course> {
    serde_json::from_str(SAMPLE_COURSES).unwrap()
}

/// A student who took the introduction to programming and aims for machine learning.
pub fn sample_student(allowed_subjects: &[&str]) -> JsonValue {
    json!({
        "Career goal": "machine learning engineer",
        "Degree program": "Computer Science",
        "CalculateByLearningGap": true,
        "Courses taken": [{
            "Subject": "CS",
            "Number": "1010",
            "Course": "CS1010",
            "Title": "Intro to Programming",
            "Description": "Programming in Python with loops and functions.",
            "Grade": "B+"
        }],
        "Allowed subject": allowed_subjects
    })
}

#[derive(Debug, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Course")]
    pub code: String,
    #[serde(rename = "Title")]
    pub title: String,
    pub score: f32,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationsResponse {
    pub fn codes(&self) -> Vec<&str> {
        self.recommendations
            .iter()
            .map(|recommendation| recommendation.code.as_str())
            .collect()
    }
}

/// Posts the student record and returns the recommendations.
pub async fn recommend(client: &Client, url: &Url, student: &JsonValue) -> RecommendationsResponse {
    send_assert_json(
        client,
        client
            .post(url.join("/recommend").unwrap())
            .json(student)
            .build()
            .unwrap(),
        StatusCode::OK,
    )
    .await
}

#[derive(Clone, Debug, Display, AsRef)]
#[as_ref(forward)]
pub struct TestId(String);

impl TestId {
    /// Generates an ID for the test.
    ///
    /// The format is `tRRRRRRRRRRRRRRRR` where `R` is a random (64bit) 0 padded hex number.
    pub fn generate() -> Self {
        let random = random::<u64>();
        Self(format!("t{random:0>16x}"))
    }

    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// Resources of a single test.
#[derive(Debug)]
pub struct TestContext {
    /// Id of the test.
    pub test_id: TestId,
    /// Directory holding the catalog artifacts, removed at the end of the test.
    pub catalog_dir: TempDir,
    /// The artifacts the server was started with.
    pub paths: ArtifactPaths,
}

impl TestContext {
    fn create(test_id: TestId) -> Result<Self, Panic> {
        let catalog_dir = TempDir::new(&format!("xayn-integration-{test_id}"))?;
        let paths = write_catalog(sample_courses(), catalog_dir.path())?;

        Ok(Self {
            test_id,
            catalog_dir,
            paths,
        })
    }
}
