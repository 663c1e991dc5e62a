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

mod cli;

use std::{ffi::OsString, fmt::Display, path::Path, process::exit};

use clap::{CommandFactory, Parser};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use self::cli::Args;
use crate::{auth, catalog, frontoffice::RecommendationsConfig, logging, net, SetupError};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
#[cfg_attr(test, serde(deny_unknown_fields))]
pub struct Config {
    pub(crate) logging: logging::Config,
    pub(crate) net: net::Config,
    pub(crate) catalog: catalog::Config,
    pub(crate) recommender: xayn_ai_recommender::Config,
    pub(crate) recommendations: RecommendationsConfig,
    pub(crate) auth: auth::Config,
}

impl Config {
    pub fn validate(&self) -> Result<(), SetupError> {
        self.recommender.validate()?;
        self.recommendations.validate()?;

        Ok(())
    }

    pub fn logging(&self) -> &logging::Config {
        &self.logging
    }
}

/// Loads the config with custom CLI args.
///
/// See [`load()`].
pub fn load_with_args<C>(
    application_names: impl IntoIterator<Item = impl Display>,
    args: impl IntoIterator<Item = impl Into<OsString> + Clone>,
) -> C
where
    C: Serialize + DeserializeOwned,
{
    load_with_parsed_args(application_names, Args::parse_from(args))
}

/// Loads the config.
///
/// # Panic/Program Exit
///
/// In case of `--help`, `--print-config` and failure
/// this functions will not return normally but terminate
/// the program normally instead.
pub fn load<C>(application_names: impl IntoIterator<Item = impl Display>) -> C
where
    C: Serialize + DeserializeOwned,
{
    load_with_parsed_args(application_names, Args::parse())
}

fn load_with_parsed_args<C>(
    application_names: impl IntoIterator<Item = impl Display>,
    mut cli_args: Args,
) -> C
where
    C: Serialize + DeserializeOwned,
{
    let config = cli_args.config.take();
    let config = match load_config(
        application_names,
        config.as_deref(),
        cli_args.to_config_overrides(),
    ) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            Args::command().print_help().ok();
            exit(1);
        }
    };

    if cli_args.print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(config) => {
                println!("{config}");
                exit(0);
            }
            Err(err) => {
                eprintln!("Error: {err}");
                exit(1);
            }
        }
    }

    config
}

/// Load the configuration into given type.
///
/// # Load order/priority
///
/// This will by ascending priority load:
///
/// 1. `./config.toml` or specified toml config file
/// 2. `./.env`
/// 3. `./.env.local`
/// 4. process environment
/// 5. options passed through `update_with`
///
/// Config values loaded from higher priority sources override such from lower
/// priority sources.
///
/// # Env and .env
///
/// Environment variables from `.env` and `.env.local` will be loaded into the process
/// environment if they don't already exist there (keeping priority as described above).
///
/// Only environment variables which start with one of the names passed in
/// `application_names` are considered, names earlier in the list take priority.
///
/// Env variable are converted into a config path by splitting it at `__` (and stripping
/// the application name). E.g. `XAYN_RECOMMENDER__RECOMMENDATIONS__SCORE_THRESHOLD=0.6`
/// will be treated like the json `{ "recommendations": { "score_threshold": 0.6 } }`
/// if `XAYN_RECOMMENDER` is in `application_names`.
fn load_config<C, U>(
    application_names: impl IntoIterator<Item = impl Display>,
    config: Option<&str>,
    update_with: U,
) -> Result<C, figment::Error>
where
    C: DeserializeOwned,
    U: Serialize,
{
    // figment joins keep the first value, so sources are added from highest to lowest priority
    load_dotenv(".env.local")?;
    load_dotenv(".env")?;

    let mut figment = Figment::new().join(Serialized::defaults(update_with));

    for name in application_names {
        figment = figment.join(Env::prefixed(&format!("{name}__")).split("__"));
    }

    let provider = config
        .map(|content_or_path| {
            if let Some(content) = content_or_path.strip_prefix("inline:") {
                Toml::string(content)
            } else {
                Toml::file(content_or_path)
            }
        })
        .or_else(|| {
            let default_file = Path::new("config.toml");
            default_file.exists().then(|| Toml::file(default_file))
        });

    if let Some(provider) = provider {
        figment = figment.join(provider);
    }

    figment.extract()
}

fn load_dotenv(file_name: &str) -> Result<(), figment::Error> {
    match dotenvy::from_filename(file_name) {
        Err(error) if !error.not_found() => {
            Err(figment::Error::from(error.to_string()).with_path(file_name))
        }
        _ => Ok(()),
    }
}
