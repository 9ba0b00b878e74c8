pub mod faults;
pub mod routes;
pub mod store;
pub mod telemetry;

use actix_web::dev::Server;
use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use std::net::TcpListener;

use crate::faults::FaultInjector;
use crate::store::TeamStore;

/// Build the server, but not await it.
///
/// Returns the port that the server has bound to by modifying the config.
pub fn build(
    config: &mut Config,
    store: TeamStore,
    faults: FaultInjector,
) -> std::io::Result<Server> {
    let store = web::Data::new(store);
    let faults = web::Data::new(faults);

    // OS assigns the port if binding to 0
    let listener = TcpListener::bind(format!("{}:{}", config.ip, config.port))?;
    config.port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(from_fn(faults::inject_faults))
            .service(routes::api_services())
            .app_data(
                web::JsonConfig::default()
                    .error_handler(routes::json_error_handler),
            )
            .app_data(store.clone())
            .app_data(faults.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct Config {
    /// set to "0.0.0.0" for public access, "127.0.0.1" for local dev
    pub ip: String,
    /// set to 0 to get an os-assigned port
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        use std::env::var;

        let ip = var("IP_ADDRESS").unwrap_or_else(|_| "127.0.0.1".into());
        let port = match var("PORT") {
            Ok(port) => port.parse().context("PORT must be a port number")?,
            Err(_) => 0,
        };
        Ok(Config { ip, port })
    }
}
