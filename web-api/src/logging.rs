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

//! Json logging of the service and the admin tool.

use std::{
    collections::BTreeMap,
    fmt,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    str::FromStr,
};

use displaydoc::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{
    error,
    level_filters::{LevelFilter, ParseLevelFilterError},
    Dispatch,
};
use tracing_subscriber::{
    filter::Targets,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

use crate::utils::RelativePathBuf;

/// A level filter which (de)serializes as its lowercase name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogLevel(LevelFilter);

impl LogLevel {
    pub const OFF: Self = Self(LevelFilter::OFF);
    pub const ERROR: Self = Self(LevelFilter::ERROR);
    pub const WARN: Self = Self(LevelFilter::WARN);
    pub const INFO: Self = Self(LevelFilter::INFO);
    pub const DEBUG: Self = Self(LevelFilter::DEBUG);
    pub const TRACE: Self = Self(LevelFilter::TRACE);
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        level.0
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.0.to_string().to_lowercase()
    }
}

impl FromStr for LogLevel {
    type Err = ParseLevelFilterError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        level.parse().map(Self)
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLevelFilterError;

    fn try_from(level: String) -> Result<Self, Self::Error> {
        level.parse()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Json log file written in addition to stdout.
    pub file: Option<RelativePathBuf>,
    /// Level of all targets without an entry in `targets`.
    pub level: LogLevel,
    /// Levels per target, e.g. `xayn_ai_recommender = "debug"` logs the cache hits and misses.
    pub targets: BTreeMap<String, LogLevel>,
    pub install_panic_hook: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            level: LogLevel::INFO,
            targets: [
                ("actix_server".into(), LogLevel::WARN),
                ("actix_http".into(), LogLevel::WARN),
            ]
            .into(),
            install_panic_hook: true,
        }
    }
}

impl Config {
    fn filter(&self) -> Targets {
        self.targets
            .iter()
            .fold(Targets::new().with_default(self.level), |filter, (target, level)| {
                filter.with_target(target, *level)
            })
    }
}

#[derive(Debug, Display, Error)]
pub enum Error {
    /// Failed to open the log file {path:?}: {source}
    File { path: PathBuf, source: io::Error },
    /// Failed to install the global logger: {0}
    Init(#[from] TryInitError),
}

/// Installs the global logger.
///
/// Events are written as json lines to stdout and, if configured, to the log file. Events inside a
/// request carry the `request_id` of the request span.
pub fn initialize_global(config: &Config) -> Result<(), Error> {
    let file = config
        .file
        .as_ref()
        .map(|file| open_log_file(&file.relative()))
        .transpose()?;
    create_dispatch(config, file).try_init()?;

    if config.install_panic_hook {
        log_panics();
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File, Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| Error::File {
            path: path.into(),
            source,
        })?;
    }
    File::create(path).map_err(|source| Error::File {
        path: path.into(),
        source,
    })
}

fn create_dispatch(config: &Config, file: Option<File>) -> Dispatch {
    let stdout = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false);
    let file = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(false)
    });

    tracing_subscriber::registry()
        .with(stdout)
        .with(file)
        .with(config.filter())
        .into()
}

fn log_panics() {
    std::panic::set_hook(Box::new(|panic| {
        let location = panic.location().map_or_else(
            || "unknown".to_string(),
            |location| format!("{}:{}", location.file(), location.line()),
        );
        error!(target: "panic", location = location.as_str(), "{panic}");
    }));
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracing::Level;
    use xayn_test_utils::temp::TempDir;

    use super::*;

    #[test]
    fn test_levels_are_lowercase_names() {
        let config: Config = serde_json::from_value(json!({
            "level": "debug",
            "targets": { "xayn_ai_recommender": "TRACE" },
        }))
        .unwrap();
        assert_eq!(config.level, LogLevel::DEBUG);
        assert_eq!(config.targets["xayn_ai_recommender"], LogLevel::TRACE);
        assert!(config.install_panic_hook);

        let config = serde_json::to_value(&config).unwrap();
        assert_eq!(config["level"], json!("debug"));
        assert_eq!(config["targets"], json!({ "xayn_ai_recommender": "trace" }));
    }

    #[test]
    fn test_invalid_level() {
        assert!(serde_json::from_value::<Config>(json!({ "level": "loud" })).is_err());
        assert!(
            serde_json::from_value::<Config>(json!({ "targets": { "actix_http": 3 } })).is_err()
        );
    }

    #[test]
    fn test_default_quiets_actix() {
        let filter = Config::default().filter();
        assert!(filter.would_enable("xayn_web_api", &Level::INFO));
        assert!(!filter.would_enable("xayn_web_api", &Level::DEBUG));
        assert!(!filter.would_enable("actix_server::worker", &Level::INFO));
        assert!(filter.would_enable("actix_http", &Level::WARN));
    }

    #[test]
    fn test_targets_override_the_level() {
        let config = Config {
            targets: [("xayn_ai_recommender".into(), LogLevel::DEBUG)].into(),
            ..Config::default()
        };
        let filter = config.filter();
        assert!(filter.would_enable("xayn_ai_recommender::cache", &Level::DEBUG));
        assert!(!filter.would_enable("xayn_web_api", &Level::DEBUG));
    }

    #[test]
    fn test_missing_log_directory_is_created() {
        let dir = TempDir::new("xayn-web-api-logging").unwrap();
        let path = dir.path().join("nested").join("service.log");
        assert!(open_log_file(&path).is_ok());
        assert!(path.is_file());
    }

    #[test]
    fn test_unopenable_log_file() {
        let dir = TempDir::new("xayn-web-api-logging").unwrap();
        assert!(matches!(open_log_file(dir.path()), Err(Error::File { .. })));
    }
}
