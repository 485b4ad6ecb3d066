use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::features::priority::scoring::ScoringWeights;
use crate::features::reports::models::TransitionPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub overpass: OverpassConfig,
    pub scoring: ScoringConfig,
    pub reports: ReportConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Overpass API (OpenStreetMap) connection settings
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint, queried as `{url}?data=...`
    pub url: String,
    /// Applied both to the HTTP request and to the `[timeout:N]` query setting
    pub timeout: Duration,
    pub user_agent: String,
}

/// Parameters of the priority score pipeline
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub max_radius_meters: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub weights: ScoringWeights,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub transition_policy: TransitionPolicy,
}

/// S3/MinIO bucket used for report photos
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    /// Base used when building photo URLs handed back to clients (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    pub photo_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            overpass: OverpassConfig::from_env()?,
            scoring: ScoringConfig::from_env()?,
            reports: ReportConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 12 * 1024 * 1024; // 12MB

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Civic Priority API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Issue reports and proximity-based priority scoring".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl OverpassConfig {
    const DEFAULT_URL: &'static str = "https://overpass-api.de/api/interpreter";
    const DEFAULT_TIMEOUT_SECS: u64 = 25;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("OVERPASS_URL").unwrap_or_else(|_| Self::DEFAULT_URL.to_string());

        let timeout_secs = env::var("OVERPASS_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "OVERPASS_TIMEOUT_SECS must be a valid number".to_string())?;
        if timeout_secs == 0 {
            return Err("OVERPASS_TIMEOUT_SECS must be greater than zero".to_string());
        }

        let user_agent = env::var("OVERPASS_USER_AGENT")
            .unwrap_or_else(|_| "CivicPriorityCore/0.1 (issue-reporting)".to_string());

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent,
        })
    }
}

impl ScoringConfig {
    const DEFAULT_MAX_RADIUS_METERS: f64 = 500.0;
    const DEFAULT_MIN_SCORE: f64 = 0.0;
    const DEFAULT_MAX_SCORE: f64 = 50.0;

    pub fn from_env() -> Result<Self, String> {
        let max_radius_meters = parse_f64_var("SCORING_MAX_RADIUS_METERS")?
            .unwrap_or(Self::DEFAULT_MAX_RADIUS_METERS);
        if max_radius_meters <= 0.0 {
            return Err("SCORING_MAX_RADIUS_METERS must be positive".to_string());
        }

        let min_score = parse_f64_var("SCORING_MIN_SCORE")?.unwrap_or(Self::DEFAULT_MIN_SCORE);
        let max_score = parse_f64_var("SCORING_MAX_SCORE")?.unwrap_or(Self::DEFAULT_MAX_SCORE);
        if max_score <= min_score {
            return Err("SCORING_MAX_SCORE must be greater than SCORING_MIN_SCORE".to_string());
        }

        let mut weights = ScoringWeights::default();
        if let Ok(raw) = env::var("SCORING_WEIGHTS") {
            weights = weights.with_overrides(parse_weights(&raw)?);
        }
        if let Some(default_weight) = parse_f64_var("SCORING_DEFAULT_WEIGHT")? {
            if default_weight < 0.0 {
                return Err("SCORING_DEFAULT_WEIGHT must not be negative".to_string());
            }
            weights.default_weight = default_weight;
        }

        Ok(Self {
            max_radius_meters,
            min_score,
            max_score,
            weights,
        })
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_radius_meters: Self::DEFAULT_MAX_RADIUS_METERS,
            min_score: Self::DEFAULT_MIN_SCORE,
            max_score: Self::DEFAULT_MAX_SCORE,
            weights: ScoringWeights::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, String> {
        let transition_policy = match env::var("REPORT_TRANSITION_POLICY") {
            Ok(raw) => raw.parse::<TransitionPolicy>()?,
            Err(_) => TransitionPolicy::default(),
        };

        Ok(Self { transition_policy })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("S3_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        let public_endpoint = env::var("S3_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        let access_key = env::var("S3_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let secret_key = env::var("S3_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let bucket = env::var("S3_BUCKET").unwrap_or_else(|_| "report-photos".to_string());
        let region = env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let photo_prefix = env::var("S3_PHOTO_PREFIX").unwrap_or_else(|_| "photos".to_string());

        Ok(Self {
            endpoint,
            public_endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            photo_prefix,
        })
    }
}

fn parse_f64_var(name: &str) -> Result<Option<f64>, String> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(None),
    }
}

/// Parses `"hospital=5,school=4"` into a weight table
pub fn parse_weights(raw: &str) -> Result<HashMap<String, f64>, String> {
    let mut weights = HashMap::new();

    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| format!("Invalid SCORING_WEIGHTS entry '{}': expected name=value", entry))?;

        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(format!("Invalid SCORING_WEIGHTS entry '{}': empty name", entry));
        }

        let value = value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| {
                format!(
                    "Invalid SCORING_WEIGHTS entry '{}': weight must be a positive number",
                    entry
                )
            })?;

        weights.insert(name, value);
    }

    Ok(weights)
}
