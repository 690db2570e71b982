use anyhow::{bail, Context};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub links: LinkConfig,
    pub cache: CacheConfig,
    pub client_address: ClientAddressConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Status code used for `/go/{slug}` redirects
    pub redirect_status: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub slug_length: usize,
    /// Slugs tried before giving up on a uniqueness conflict
    pub slug_max_attempts: u32,
    /// Lifetime of newly created links; `None` means they never expire
    pub ttl_secs: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 0 disables the read cache
    pub max_entries: u64,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustedProxyMode {
    /// Use the socket peer address only
    None,
    /// Trust `Forwarded` / `X-Forwarded-For`
    Standard,
    /// Trust `CF-Connecting-IP`
    Cloudflare,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientAddressConfig {
    pub trusted_proxy_mode: TrustedProxyMode,
    /// Proxy networks skipped when walking `X-Forwarded-For` from the right
    pub trusted_proxies: Vec<IpNet>,
    /// Fixed number of proxy hops to skip; takes precedence over `trusted_proxies`
    pub num_trusted_proxies: Option<usize>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            slug_length: 6,
            slug_max_attempts: 5,
            ttl_secs: None,
        }
    }
}

impl Default for ClientAddressConfig {
    fn default() -> Self {
        Self {
            trusted_proxy_mode: TrustedProxyMode::None,
            trusted_proxies: Vec::new(),
            num_trusted_proxies: None,
        }
    }
}

impl ServerConfig {
    const ALLOWED_REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./smartlink.db".to_string());
        let max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_env("PORT", 8080u16)?;

        let redirect_status = parse_env("REDIRECT_STATUS", 302u16)?;
        if !ServerConfig::ALLOWED_REDIRECT_STATUSES.contains(&redirect_status) {
            bail!(
                "REDIRECT_STATUS must be one of {:?}, got {redirect_status}",
                ServerConfig::ALLOWED_REDIRECT_STATUSES
            );
        }

        let defaults = LinkConfig::default();
        let slug_length = parse_env("SLUG_LENGTH", defaults.slug_length)?;
        if slug_length == 0 {
            bail!("SLUG_LENGTH must be at least 1");
        }
        let slug_max_attempts = parse_env("SLUG_MAX_ATTEMPTS", defaults.slug_max_attempts)?.max(1);
        let ttl_secs = std::env::var("LINK_TTL_SECS")
            .ok()
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("LINK_TTL_SECS must be an integer number of seconds")?
            .filter(|ttl| *ttl > 0);

        let cache_max_entries = parse_env("CACHE_MAX_ENTRIES", 10_000u64)?;
        let cache_ttl_secs = parse_env("CACHE_TTL_SECS", 300u64)?;

        let trusted_proxy_mode = match std::env::var("TRUSTED_PROXY_MODE")
            .unwrap_or_else(|_| "none".to_string())
            .to_lowercase()
            .as_str()
        {
            "none" => TrustedProxyMode::None,
            "standard" => TrustedProxyMode::Standard,
            "cloudflare" => TrustedProxyMode::Cloudflare,
            other => {
                tracing::warn!(
                    "Unknown TRUSTED_PROXY_MODE '{other}', falling back to 'none'. Supported values: none, standard, cloudflare"
                );
                TrustedProxyMode::None
            }
        };

        let trusted_proxies = match std::env::var("TRUSTED_PROXIES") {
            Ok(list) => parse_cidr_list(&list)?,
            Err(_) => Vec::new(),
        };

        let num_trusted_proxies = std::env::var("NUM_TRUSTED_PROXIES")
            .ok()
            .map(|v| v.parse::<usize>())
            .transpose()
            .context("NUM_TRUSTED_PROXIES must be a non-negative integer")?;

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            server: ServerConfig {
                host,
                port,
                redirect_status,
            },
            links: LinkConfig {
                slug_length,
                slug_max_attempts,
                ttl_secs,
            },
            cache: CacheConfig {
                max_entries: cache_max_entries,
                ttl_secs: cache_ttl_secs,
            },
            client_address: ClientAddressConfig {
                trusted_proxy_mode,
                trusted_proxies,
                num_trusted_proxies,
            },
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: '{value}'")),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated list of CIDR ranges. Bare addresses become host routes.
pub fn parse_cidr_list(list: &str) -> anyhow::Result<Vec<IpNet>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            parse_trusted_net(entry)
                .with_context(|| format!("invalid CIDR in TRUSTED_PROXIES: '{entry}'"))
        })
        .collect()
}

fn parse_trusted_net(entry: &str) -> anyhow::Result<IpNet> {
    if let Ok(net) = entry.parse::<IpNet>() {
        return Ok(net);
    }

    let addr: std::net::IpAddr = entry.parse()?;
    let prefix_len = if addr.is_ipv4() { 32 } else { 128 };
    Ok(IpNet::new(addr, prefix_len)?)
}
