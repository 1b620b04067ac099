use crate::error::{env_error, AppResult};
use crate::ics_import::genre::{GenreRule, GenreTable};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default genre table override location
pub const GENRES_FILE: &str = "config/genres.toml";

/// Default referer pinned on source image fetches
pub const DEFAULT_RELAY_REFERER: &str = "https://www.facebook.com/";

/// Default browser user-agent for source image fetches
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Settings for the image relay cascade
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Referer and origin sent with the source fetch
    pub referer: String,
    /// User-agent sent with the source fetch
    pub user_agent: String,
    /// Upload endpoint of hosting service A
    pub hosted_a_endpoint: String,
    /// Optional client id for hosting service A
    pub hosted_a_client_id: Option<String>,
    /// Upload endpoint of hosting service B
    pub hosted_b_endpoint: String,
    /// Prefix every valid hosting service B reply starts with
    pub hosted_b_url_prefix: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            referer: DEFAULT_RELAY_REFERER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            hosted_a_endpoint: "https://api.imgur.com/3/image".to_string(),
            hosted_a_client_id: None,
            hosted_b_endpoint: "https://catbox.moe/user/api.php".to_string(),
            hosted_b_url_prefix: "https://files.catbox.moe/".to_string(),
        }
    }
}

/// Main configuration structure for the server
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Root of publicly served files
    pub public_dir: PathBuf,
    /// Prefix for locally stored image URLs
    pub public_base_url: String,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
    /// Image relay settings
    pub relay: RelayConfig,
    /// Ordered genre keyword table
    pub genres: GenreTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_dir: PathBuf::from("./public"),
            public_base_url: String::new(),
            max_upload_bytes: 10 * 1024 * 1024,
            relay: RelayConfig::default(),
            genres: GenreTable::default(),
        }
    }
}

/// Layout of `config/genres.toml`
#[derive(Debug, Deserialize)]
struct GenresFile {
    genres: Vec<GenreRule>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        let host = env::var("HOST").unwrap_or(defaults.host);

        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| env_error("PORT"))?,
            Err(_) => defaults.port,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(value) => value
                .parse::<usize>()
                .map_err(|_| env_error("MAX_UPLOAD_BYTES"))?,
            Err(_) => defaults.max_upload_bytes,
        };

        let public_dir = env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.public_dir);
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.public_base_url);

        let relay_defaults = defaults.relay;
        let relay = RelayConfig {
            referer: env::var("RELAY_REFERER").unwrap_or(relay_defaults.referer),
            user_agent: env::var("RELAY_USER_AGENT").unwrap_or(relay_defaults.user_agent),
            hosted_a_endpoint: env::var("HOSTED_A_ENDPOINT")
                .unwrap_or(relay_defaults.hosted_a_endpoint),
            hosted_a_client_id: env::var("HOSTED_A_CLIENT_ID")
                .ok()
                .filter(|id| !id.trim().is_empty()),
            hosted_b_endpoint: env::var("HOSTED_B_ENDPOINT")
                .unwrap_or(relay_defaults.hosted_b_endpoint),
            hosted_b_url_prefix: env::var("HOSTED_B_URL_PREFIX")
                .unwrap_or(relay_defaults.hosted_b_url_prefix),
        };

        let genres = load_genres(Path::new(GENRES_FILE));

        Ok(Config {
            host,
            port,
            public_dir,
            public_base_url,
            max_upload_bytes,
            relay,
            genres,
        })
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the genre table from a TOML file, falling back to the built-in table
pub fn load_genres(path: &Path) -> GenreTable {
    let Ok(content) = fs::read_to_string(path) else {
        return GenreTable::default();
    };

    match parse_genres(&content) {
        Ok(table) => {
            info!("Loaded {} genre rules from {}", table.len(), path.display());
            table
        }
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            GenreTable::default()
        }
    }
}

/// Parse genre rules from TOML content, preserving file order
pub fn parse_genres(content: &str) -> AppResult<GenreTable> {
    let file: GenresFile = toml::from_str(content)?;
    Ok(GenreTable::new(file.genres))
}
