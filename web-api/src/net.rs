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

use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};

use actix_cors::Cors;
use actix_web::{
    dev::ServerHandle,
    middleware,
    web::{self, Data, JsonConfig, ServiceConfig},
    App,
    HttpResponse,
    HttpServer,
};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::info;
use url::Url;

use crate::{
    app::AppState,
    middleware::{json_error::wrap_non_json_errors, request_context::setup_request_context},
    SetupError,
};

mod serde_duration_as_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Configuration for roughly network/connection layer specific configurations.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Address to which the server should bind.
    pub(crate) bind_to: SocketAddr,

    /// Max body size limit which should be applied to all endpoints
    pub(crate) max_body_size: usize,

    /// Keep alive timeout in seconds
    #[serde(with = "serde_duration_as_seconds")]
    pub(crate) keep_alive: Duration,

    /// Client request timeout in seconds
    #[serde(with = "serde_duration_as_seconds")]
    pub(crate) client_request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_to: SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 4252).into(),
            max_body_size: 524_288,
            keep_alive: Duration::from_secs(61),
            client_request_timeout: Duration::from_secs(0),
        }
    }
}

/// Handle to a running server.
pub struct AppHandle {
    addresses: Vec<SocketAddr>,
    url: Url,
    server: ServerHandle,
    term_handle: JoinHandle<Result<(), SetupError>>,
}

impl AppHandle {
    /// The addresses the server is bound to.
    pub fn addresses(&self) -> &[SocketAddr] {
        &self.addresses
    }

    /// The base url of the server, derived from the first bound address.
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// Waits until the server terminated on its own, e.g. due to a signal.
    pub async fn wait_for_termination(self) -> Result<(), SetupError> {
        self.term_handle.await?
    }

    /// Gracefully stops the server and waits for it to terminate.
    pub async fn stop_and_wait(self) -> Result<(), SetupError> {
        self.server.stop(true).await;
        self.wait_for_termination().await
    }
}

pub(crate) fn start_actix_server(
    config: &Config,
    app_state: Data<AppState>,
    configure_services: impl Fn(&mut ServiceConfig) + Clone + Send + 'static,
) -> Result<AppHandle, SetupError> {
    let &Config {
        bind_to,
        max_body_size,
        keep_alive,
        client_request_timeout,
    } = config;

    let json_config = JsonConfig::default().limit(max_body_size);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(json_config.clone())
            .service(web::resource("/health").route(web::get().to(HttpResponse::Ok)))
            .configure(&configure_services)
            .wrap_fn(wrap_non_json_errors)
            .wrap_fn(setup_request_context)
            .wrap(middleware::Compress::default())
            .wrap(Cors::permissive())
    })
    .keep_alive(keep_alive)
    .client_request_timeout(client_request_timeout)
    .bind(bind_to)?;

    let addresses = server.addrs();
    let address = addresses
        .first()
        .ok_or_else(|| anyhow!("server is not bound to any address"))?;
    let url = Url::parse(&format!("http://{address}/"))?;
    info!(%url, "server bound");

    let server = server.run();
    let handle = server.handle();
    let term_handle = tokio::spawn(async move { server.await.map_err(Into::into) });

    Ok(AppHandle {
        addresses,
        url,
        server: handle,
        term_handle,
    })
}
