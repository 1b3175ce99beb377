//! Configuration module
//!
//! All settings are read once at startup. External clients (media store, payment
//! gateway, database pool) are built from this configuration and injected; nothing
//! reads the environment after `Config::from_env` returns.

use std::env;

use crate::storage_types::MediaBackend;

const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24 * 7;
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_CONCURRENT_REQUESTS: usize = 256;
const IMAGE_MAX_WIDTH: u32 = 1920;
const IMAGE_MAX_HEIGHT: u32 = 1080;
const AVATAR_MAX_DIMENSION: u32 = 512;
const JPEG_QUALITY: u8 = 80;
const MEDIA_UPLOAD_CONCURRENCY: usize = 8;
const MEDIA_DELETE_CONCURRENCY: usize = 16;

/// HTTP server and authentication settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub max_body_bytes: usize,
    pub request_timeout_seconds: u64,
    pub max_concurrent_requests: usize,
    pub admin_registration_key: Option<String>,
}

/// Remote media store and compression settings
#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    pub imagekit_public_key: Option<String>,
    pub imagekit_private_key: Option<String>,
    pub imagekit_url_endpoint: Option<String>,
    pub local_storage_path: String,
    pub local_storage_base_url: String,
    /// Folder for media embedded in entity documents
    pub folder: String,
    /// Folder for the standalone image upload endpoint
    pub upload_folder: String,
    /// Folder for profile avatars
    pub avatar_folder: String,
    pub image_max_width: u32,
    pub image_max_height: u32,
    pub avatar_max_dimension: u32,
    pub jpeg_quality: u8,
    pub upload_concurrency: usize,
    pub delete_concurrency: usize,
}

/// Payment gateway settings; payments are disabled when no key pair is configured
#[derive(Clone, Debug)]
pub struct PaymentConfig {
    pub razorpay_key_id: Option<String>,
    pub razorpay_key_secret: Option<String>,
    pub currency: String,
}

impl PaymentConfig {
    pub fn is_enabled(&self) -> bool {
        self.razorpay_key_id.is_some() && self.razorpay_key_secret.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub media: MediaConfig,
    pub payment: PaymentConfig,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AppConfig>);

impl Config {
    fn as_app(&self) -> &AppConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_app().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = AppConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_app().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_app().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_app().base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_app().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_app().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_app().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_app().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.as_app().base.jwt_expiry_hours
    }

    pub fn max_body_bytes(&self) -> usize {
        self.as_app().base.max_body_bytes
    }

    pub fn request_timeout_seconds(&self) -> u64 {
        self.as_app().base.request_timeout_seconds
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.as_app().base.max_concurrent_requests
    }

    pub fn admin_registration_key(&self) -> Option<&str> {
        self.as_app().base.admin_registration_key.as_deref()
    }

    pub fn database_url(&self) -> &str {
        &self.as_app().database_url
    }

    pub fn media(&self) -> &MediaConfig {
        &self.as_app().media
    }

    pub fn payment(&self) -> &PaymentConfig {
        &self.as_app().payment
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl AppConfig {
    /// Build the configuration from a key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: match lookup("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            environment,
            cors_origins,
            db_max_connections: parse_or(lookup("DB_MAX_CONNECTIONS"), MAX_CONNECTIONS),
            db_timeout_seconds: parse_or(lookup("DB_TIMEOUT_SECONDS"), CONNECTION_TIMEOUT_SECS),
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: parse_or(lookup("JWT_EXPIRY_HOURS"), JWT_EXPIRY_HOURS),
            max_body_bytes: parse_or(lookup("MAX_BODY_BYTES"), MAX_BODY_BYTES),
            request_timeout_seconds: parse_or(
                lookup("REQUEST_TIMEOUT_SECONDS"),
                REQUEST_TIMEOUT_SECS,
            ),
            max_concurrent_requests: parse_or(
                lookup("MAX_CONCURRENT_REQUESTS"),
                MAX_CONCURRENT_REQUESTS,
            ),
            admin_registration_key: lookup("ADMIN_REGISTRATION_KEY").filter(|k| !k.is_empty()),
        };

        let backend = match lookup("MEDIA_STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => MediaBackend::ImageKit,
        };

        let media = MediaConfig {
            backend,
            imagekit_public_key: lookup("IMAGEKIT_PUBLIC_KEY"),
            imagekit_private_key: lookup("IMAGEKIT_PRIVATE_KEY"),
            imagekit_url_endpoint: lookup("IMAGEKIT_URL_ENDPOINT"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| "./storage/media".to_string()),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/media", base.server_port)),
            folder: lookup("MEDIA_FOLDER").unwrap_or_else(|| "workshops".to_string()),
            upload_folder: lookup("UPLOAD_FOLDER").unwrap_or_else(|| "/mind-club".to_string()),
            avatar_folder: lookup("AVATAR_FOLDER").unwrap_or_else(|| "avatars".to_string()),
            image_max_width: parse_or(lookup("IMAGE_MAX_WIDTH"), IMAGE_MAX_WIDTH),
            image_max_height: parse_or(lookup("IMAGE_MAX_HEIGHT"), IMAGE_MAX_HEIGHT),
            avatar_max_dimension: parse_or(lookup("AVATAR_MAX_DIMENSION"), AVATAR_MAX_DIMENSION),
            jpeg_quality: parse_or(lookup("JPEG_QUALITY"), JPEG_QUALITY),
            upload_concurrency: parse_or(
                lookup("MEDIA_UPLOAD_CONCURRENCY"),
                MEDIA_UPLOAD_CONCURRENCY,
            ),
            delete_concurrency: parse_or(
                lookup("MEDIA_DELETE_CONCURRENCY"),
                MEDIA_DELETE_CONCURRENCY,
            ),
        };

        let payment = PaymentConfig {
            razorpay_key_id: lookup("RAZORPAY_KEY_ID").filter(|k| !k.is_empty()),
            razorpay_key_secret: lookup("RAZORPAY_KEY_SECRET").filter(|k| !k.is_empty()),
            currency: lookup("PAYMENT_CURRENCY").unwrap_or_else(|| "INR".to_string()),
        };

        Ok(AppConfig {
            base,
            database_url: lookup("DATABASE_URL")
                .or_else(|| lookup("MONGODB_URI"))
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            media,
            payment,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if is_production_env(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        match self.media.backend {
            MediaBackend::ImageKit => {
                if self.media.imagekit_private_key.is_none()
                    || self.media.imagekit_url_endpoint.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "IMAGEKIT_PRIVATE_KEY and IMAGEKIT_URL_ENDPOINT must be set when using the imagekit backend"
                    ));
                }
            }
            MediaBackend::Local => {
                if self.media.local_storage_path.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using the local backend"
                    ));
                }
            }
        }

        if self.media.image_max_width == 0
            || self.media.image_max_height == 0
            || self.media.avatar_max_dimension == 0
        {
            return Err(anyhow::anyhow!("Image size caps must be greater than zero"));
        }

        if !(1..=100).contains(&self.media.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if self.payment.razorpay_key_id.is_some() != self.payment.razorpay_key_secret.is_some() {
            return Err(anyhow::anyhow!(
                "RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET must be set together"
            ));
        }

        Ok(())
    }
}
