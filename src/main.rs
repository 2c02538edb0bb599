use anyhow::{Context, Result};
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::{debug, error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

mod console;
mod endpoint;
mod press;
mod render;
mod resolver;
mod share;
mod structs;

use resolver::HostResolver;
use structs::{catalog::Catalog, config::Config, state::Navigator};

fn main() -> Result<()> {
    // Initialize dotenv
    dotenv::dotenv().ok();

    // Set up structured logging with environment variable control
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true) // Include target module in logs
        .compact() // Use compact format
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set up global tracing subscriber")?;

    info!("🧭 PortDeck dashboard starting up");

    // Load configuration from portdeck.yaml
    let config_path = "portdeck.yaml";
    if !Path::new(config_path).exists() {
        error!("⛔ Configuration file '{}' not found", config_path);

        return Err(anyhow::anyhow!(
            "Configuration file '{}' not found",
            config_path
        ));
    }

    let config = Config::load(config_path).context(format!(
        "Failed to parse configuration file '{config_path}'",
    ))?;

    // Log the loaded configuration
    info!(
        groups_count = config.services.len(),
        rules_count = config.host_resolution.len(),
        "📋 Configuration loaded"
    );

    // The viewer's network address decides which backend host serves the
    // proxied services. The page equivalent would be the browser's own
    // location; here it comes from the environment.
    let client_address =
        std::env::var("PORTDECK_CLIENT_ADDR").unwrap_or_else(|_| resolver::DEFAULT_HOST.to_string());
    let host_resolver = HostResolver::new(&config.host_resolution);
    let backend_host = host_resolver.resolve(&client_address).to_string();
    info!(
        client = %client_address,
        backend = %backend_host,
        "🔀 Backend host resolved"
    );

    let catalog = Catalog::from_config(&config, &backend_host);
    for group in &catalog.groups {
        info!(
            group = %group.name,
            services_count = group.services.len(),
            "🗂️ Group configured"
        );

        for service in &group.services {
            debug!(
                service = %service.id,
                endpoint = %service.endpoint,
                newtab = service.newtab.unwrap_or(false),
                "Service endpoint resolved"
            );
        }
    }

    // The page URL carries the shareable state; reloading it restores the
    // same active service.
    let page_url = match std::env::var("PORTDECK_PAGE_URL") {
        Ok(raw) => Url::parse(&raw).context("Invalid PORTDECK_PAGE_URL")?,
        Err(_) => Url::parse("http://localhost/").context("Failed to build default page URL")?,
    };

    let mut navigator = Navigator::new(catalog, page_url);
    navigator.restore();

    // Set up signal handling for cleanup on exit
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(async {
        tokio::spawn(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl+c");
            info!("⏹️ Shutdown signal received");

            std::process::exit(0);
        });
    });

    info!("✅ PortDeck initialization complete");
    console::run(&mut navigator)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The whole startup path: parse, resolve the backend for a client on
    // the 10.0/16 lab subnet, build the catalog and restore from a shared
    // link.
    #[test]
    fn startup_resolves_and_restores_from_page_url() {
        let config: Config = serde_yaml::from_str(
            r#"
host-resolution:
  - "10.0.*.*": "10.0.0.5"
  - "192.168.1.*": "192.168.1.20"

services:
  Infra:
    Grafana:
      - port: 3000
  Mail:
    Mail: []
"#,
        )
        .unwrap();

        let host_resolver = HostResolver::new(&config.host_resolution);
        let backend_host = host_resolver.resolve("10.0.1.7");
        assert_eq!(backend_host, "10.0.0.5");

        let catalog = Catalog::from_config(&config, backend_host);
        let page_url = url::Url::parse("http://deck.lab/?page=grafana").unwrap();

        let mut navigator = Navigator::new(catalog, page_url);
        navigator.restore();

        let active = navigator.active().expect("a service should be active");
        assert_eq!(active.id, "grafana");
        assert_eq!(active.endpoint, "http://10.0.0.5:3000");
    }

    #[test]
    fn startup_with_unmatched_client_uses_the_default_host() {
        let config: Config = serde_yaml::from_str(
            r#"
services:
  Mail:
    Mail: []
"#,
        )
        .unwrap();

        let host_resolver = HostResolver::new(&config.host_resolution);
        let backend_host = host_resolver.resolve("172.16.0.9");

        let catalog = Catalog::from_config(&config, backend_host);
        assert_eq!(
            catalog.get("mail").unwrap().endpoint,
            "http://localhost/Mail"
        );
    }
}
