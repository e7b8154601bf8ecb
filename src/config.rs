use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STATE_KEY: &str = "sticker_app_state";

pub const DEFAULT_STYLE_PROMPT: &str =
    "sticker style, vector illustration, background transparency, flat color, pop, no shadow";

pub const DEFAULT_ASSETS: [&str; 4] = [
    "assets/cat.png",
    "assets/gem.png",
    "assets/star.png",
    "assets/heart.png",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub redis: RedisConfig,
    pub generator: GeneratorConfig,
    pub exchange: ExchangeConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Redis,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "redis" => Some(Self::Redis),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub style_prompt: String,
    pub width: u32,
    pub height: u32,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub assets: Vec<String>,
    pub qr_size: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            base_url: "https://pollinations.ai".to_string(),
            style_prompt: DEFAULT_STYLE_PROMPT.to_string(),
            width: 600,
            height: 600,
            model: "flux".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            assets: DEFAULT_ASSETS.iter().map(|a| a.to_string()).collect(),
            qr_size: 200,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let generator_defaults = GeneratorConfig::default();
        let exchange_defaults = ExchangeConfig::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            },
            storage: StorageConfig {
                backend: env::var("STORAGE_BACKEND")
                    .ok()
                    .and_then(|b| StorageBackend::parse(&b))
                    .unwrap_or(StorageBackend::File),
                data_dir: env::var("STORAGE_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("data")),
                key: env::var("STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STATE_KEY.to_string()),
            },
            redis: RedisConfig {
                host: env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: env::var("REDIS_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(6379),
                password: env::var("REDIS_PASSWORD").ok(),
                db: env::var("REDIS_DB")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0),
            },
            generator: GeneratorConfig {
                base_url: env::var("GENERATOR_BASE_URL").unwrap_or(generator_defaults.base_url),
                style_prompt: env::var("GENERATOR_STYLE_PROMPT")
                    .unwrap_or(generator_defaults.style_prompt),
                width: env::var("GENERATOR_WIDTH")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(generator_defaults.width),
                height: env::var("GENERATOR_HEIGHT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(generator_defaults.height),
                model: env::var("GENERATOR_MODEL").unwrap_or(generator_defaults.model),
                timeout: env::var("GENERATOR_TIMEOUT_SECS")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(generator_defaults.timeout),
            },
            exchange: ExchangeConfig {
                assets: env::var("EXCHANGE_ASSETS")
                    .ok()
                    .map(|list| parse_asset_list(&list))
                    .unwrap_or(exchange_defaults.assets),
                qr_size: env::var("EXCHANGE_QR_SIZE")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(exchange_defaults.qr_size),
            },
        }
    }

    pub fn redis_url(&self) -> String {
        match &self.redis.password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                password, self.redis.host, self.redis.port, self.redis.db
            ),
            None => format!(
                "redis://{}:{}/{}",
                self.redis.host, self.redis.port, self.redis.db
            ),
        }
    }
}

fn parse_asset_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
