//! Re-host hot-link protected images.
//!
//! The source is fetched once with browser-like headers, then offered to each hosting
//! service in order. The first URL wins; if every host rejects the upload the bytes are
//! written to the local public directory.

pub mod fetch;
pub mod hosts;
pub mod local;
pub mod models;

use crate::config::{Config, RelayConfig};
use crate::error::{validation_error, AppResult};
use hosts::{HostedA, HostedB, ImageHost};
use local::LocalStore;
use models::{RelayResult, Service};
use reqwest::Client;
use tracing::{info, warn};

/// The relay cascade: source fetch, ordered hosts, local fallback
pub struct ImageRelay {
    client: Client,
    config: RelayConfig,
    hosts: Vec<Box<dyn ImageHost>>,
    local: LocalStore,
}

impl ImageRelay {
    /// Build a relay with explicit hosts, tried in the given order
    pub fn new(
        client: Client,
        config: RelayConfig,
        hosts: Vec<Box<dyn ImageHost>>,
        local: LocalStore,
    ) -> Self {
        Self {
            client,
            config,
            hosts,
            local,
        }
    }

    /// Build the standard hosted-a -> hosted-b -> local cascade from configuration
    pub fn from_config(config: &Config) -> Self {
        let relay = config.relay.clone();
        let hosts: Vec<Box<dyn ImageHost>> = vec![
            Box::new(HostedA {
                endpoint: relay.hosted_a_endpoint.clone(),
                client_id: relay.hosted_a_client_id.clone(),
            }),
            Box::new(HostedB {
                endpoint: relay.hosted_b_endpoint.clone(),
                url_prefix: relay.hosted_b_url_prefix.clone(),
            }),
        ];
        let local = LocalStore::new(&config.public_dir, &config.public_base_url);

        Self::new(Client::new(), relay, hosts, local)
    }

    /// Relay one image. Only an empty URL, a failed source fetch or a failed local
    /// write end the request with an error.
    pub async fn relay(&self, source_url: &str) -> AppResult<RelayResult> {
        let source_url = source_url.trim();
        if source_url.is_empty() {
            return Err(validation_error("imageUrl is required"));
        }

        let image = fetch::fetch_source(&self.client, &self.config, source_url).await?;

        for host in &self.hosts {
            match host.attempt(&self.client, &image).await {
                Ok(url) => {
                    info!("Relayed {} via {}: {}", source_url, host.service(), url);
                    return Ok(RelayResult {
                        url,
                        source_url: source_url.to_string(),
                        size_bytes: image.len(),
                        service: host.service(),
                    });
                }
                Err(e) => warn!("{}", e),
            }
        }

        info!("All hosting services failed, storing {} locally", source_url);
        let url = self.local.save(&image).await?;

        Ok(RelayResult {
            url,
            source_url: source_url.to_string(),
            size_bytes: image.len(),
            service: Service::Local,
        })
    }
}
