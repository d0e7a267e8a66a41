use std::{
    error::Error,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tracing_subscriber::EnvFilter;
use wrapp_config::{Config, ConfigProvider};
use wrapp_lifecycle::{Component, ComponentSpec, Dependencies, DynError, System};

struct DatabaseConfig {
    url: String,
}

struct HttpConfig {
    port: u16,
}

struct Database {
    url: String,
    connected: AtomicBool,
}

impl Component for Database {
    fn start(&self) -> Result<(), DynError> {
        tracing::info!("Connecting to {}", self.url);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), DynError> {
        tracing::info!("Disconnecting from {}", self.url);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

struct HttpServer {
    port: u16,
    database: Arc<Database>,
}

impl Component for HttpServer {
    fn start(&self) -> Result<(), DynError> {
        if !self.database.connected.load(Ordering::SeqCst) {
            return Err("database is not connected".into());
        }
        tracing::info!("Listening on port {}", self.port);
        Ok(())
    }

    fn stop(&self) -> Result<(), DynError> {
        tracing::info!("Closing port {}", self.port);
        Ok(())
    }
}

fn database(deps: &Dependencies) -> Result<Database, DynError> {
    let config = Config::<DatabaseConfig>::resolve(deps, "config")?;
    Ok(Database {
        url: config.url.clone(),
        connected: AtomicBool::new(false),
    })
}

fn http_server(deps: &Dependencies) -> Result<HttpServer, DynError> {
    let config = Config::<HttpConfig>::resolve(deps, "config")?;
    Ok(HttpServer {
        port: config.port,
        database: deps.require("database")?,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_target(false)
        .init();

    let mut configs = ConfigProvider::new();
    configs
        .add_config(DatabaseConfig {
            url: "postgres://localhost/demo".to_string(),
        })?
        .add_config(HttpConfig { port: 8080 })?;

    let mut system = System::builder()
        .component("config", ComponentSpec::new(move |_| configs.clone()))
        .component(
            "database",
            ComponentSpec::try_new(database).depends_on(["config"]),
        )
        .component(
            "http",
            ComponentSpec::try_new(http_server).depends_on(["database", "config"]),
        )
        .build()?;

    system.validate()?;
    println!("Start order: {:?}", system.resolve()?);

    system.start()?;
    println!("{system:?}");

    let server = system.get::<HttpServer>("http")?;
    println!("HTTP server running on port {}", server.port);
    drop(server);

    system.stop()?;
    println!("{system:?}");

    Ok(())
}
