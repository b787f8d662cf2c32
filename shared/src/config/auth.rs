//! Authentication configuration: signing keys, refresh cookie, session lifecycle

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ConfigError, EnvReader, Environment};

/// Algorithms the signer understands, grouped by key family
const ASYMMETRIC_ALGORITHMS: &[&str] = &["RS256", "RS384", "RS512", "PS256", "PS384", "PS512"];
const SYMMETRIC_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Minimum shared-secret length outside development
const MIN_SECRET_BYTES: usize = 32;

/// Minimum refresh identifier entropy (128 bits)
pub const MIN_REFRESH_NUM_BYTES: usize = 16;

/// Longest accepted access token lifetime (one day)
pub const MAX_JWT_EXPIRE_MINUTES: i64 = 24 * 60;

/// Largest accepted expiry leeway (one hour)
pub const MAX_JWT_LEEWAY_SECONDS: i64 = 3600;

/// Upper bound for refresh lifetime and retention (ten years)
pub const MAX_LIFETIME_SECONDS: i64 = 10 * 365 * 24 * 3600;

/// Longest accepted cleanup interval (one week)
pub const MAX_CLEANUP_INTERVAL_SECONDS: u64 = 7 * 24 * 3600;

/// Access token signing configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Signing algorithm name (RS256, PS256, HS256, ...)
    pub algorithm: String,

    /// Inline PEM private key (PKCS#1 or PKCS#8)
    #[serde(skip_serializing, default)]
    pub private_key_pem: Option<String>,

    /// Path to a PEM private key, used when no inline PEM is set
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,

    /// Shared secret for HMAC algorithms
    #[serde(skip_serializing, default)]
    pub secret: Option<String>,

    /// Key identifier embedded in token headers and the key set
    pub key_id: String,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Access token lifetime in minutes
    pub expire_minutes: i64,

    /// Clock skew tolerated when checking expiry, in seconds
    pub leeway_seconds: i64,

    /// Path the key set document is served on
    pub jwks_path: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("private_key_pem", &self.private_key_pem.as_ref().map(|_| "<redacted>"))
            .field("private_key_path", &self.private_key_path)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expire_minutes", &self.expire_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("jwks_path", &self.jwks_path)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: String::from("RS256"),
            private_key_pem: None,
            private_key_path: None,
            secret: None,
            key_id: String::new(),
            issuer: String::new(),
            audience: String::new(),
            expire_minutes: 15,
            leeway_seconds: 0,
            jwks_path: String::from("/.well-known/jwks.json"),
        }
    }
}

impl JwtConfig {
    pub(crate) fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            algorithm: env
                .string_or("AUTH_JWT_ALGORITHM", &defaults.algorithm)
                .to_ascii_uppercase(),
            private_key_pem: env.string("AUTH_JWT_PRIVATE_KEY_PEM"),
            private_key_path: env.string("AUTH_JWT_PRIVATE_KEY_PATH").map(PathBuf::from),
            secret: env.string("AUTH_JWT_SECRET"),
            key_id: env.string_or("AUTH_JWT_KEY_ID", ""),
            issuer: env.string_or("AUTH_JWT_ISSUER", ""),
            audience: env.string_or("AUTH_JWT_AUDIENCE", ""),
            expire_minutes: env.parse_or("AUTH_JWT_EXPIRE", defaults.expire_minutes)?,
            leeway_seconds: env.parse_or("AUTH_JWT_LEEWAY", defaults.leeway_seconds)?,
            jwks_path: env.string_or("AUTH_JWT_JWKS_PATH", &defaults.jwks_path),
        })
    }

    /// Whether the algorithm signs with a shared secret
    pub fn is_symmetric(&self) -> bool {
        SYMMETRIC_ALGORITHMS.contains(&self.algorithm.as_str())
    }

    /// Access token lifetime in seconds
    pub fn expire_seconds(&self) -> Option<i64> {
        self.expire_minutes.checked_mul(60)
    }

    /// Resolve the private key PEM, reading the key file if no inline PEM is set
    pub fn resolve_private_key_pem(&self) -> Result<String, ConfigError> {
        if let Some(pem) = &self.private_key_pem {
            return Ok(pem.replace("\\n", "\n"));
        }
        match &self.private_key_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            }),
            None => Err(ConfigError::missing("AUTH_JWT_PRIVATE_KEY_PEM")),
        }
    }

    pub fn validate(&self, environment: Environment) -> Result<(), ConfigError> {
        let algorithm = self.algorithm.as_str();
        if !ASYMMETRIC_ALGORITHMS.contains(&algorithm) && !SYMMETRIC_ALGORITHMS.contains(&algorithm) {
            return Err(ConfigError::invalid(
                "AUTH_JWT_ALGORITHM",
                format!("unsupported algorithm '{}'", self.algorithm),
            ));
        }

        if self.is_symmetric() {
            let secret = self
                .secret
                .as_deref()
                .ok_or_else(|| ConfigError::missing("AUTH_JWT_SECRET"))?;
            if !environment.is_development() && secret.len() < MIN_SECRET_BYTES {
                return Err(ConfigError::invalid(
                    "AUTH_JWT_SECRET",
                    format!("must be at least {} bytes", MIN_SECRET_BYTES),
                ));
            }
        } else if self.private_key_pem.is_none() && self.private_key_path.is_none() {
            return Err(ConfigError::missing("AUTH_JWT_PRIVATE_KEY_PEM"));
        }

        if self.key_id.is_empty() {
            return Err(ConfigError::missing("AUTH_JWT_KEY_ID"));
        }
        if self.issuer.is_empty() {
            return Err(ConfigError::missing("AUTH_JWT_ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ConfigError::missing("AUTH_JWT_AUDIENCE"));
        }
        if self.expire_minutes <= 0 || self.expire_minutes > MAX_JWT_EXPIRE_MINUTES {
            return Err(ConfigError::invalid(
                "AUTH_JWT_EXPIRE",
                format!("must be between 1 and {} minutes", MAX_JWT_EXPIRE_MINUTES),
            ));
        }
        if self.leeway_seconds < 0 || self.leeway_seconds > MAX_JWT_LEEWAY_SECONDS {
            return Err(ConfigError::invalid(
                "AUTH_JWT_LEEWAY",
                format!("must be between 0 and {} seconds", MAX_JWT_LEEWAY_SECONDS),
            ));
        }
        if !self.jwks_path.starts_with('/') {
            return Err(ConfigError::invalid("AUTH_JWT_JWKS_PATH", "must start with '/'"));
        }
        Ok(())
    }
}

/// Refresh cookie configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshConfig {
    /// Random bytes drawn for each refresh identifier
    pub num_bytes: usize,

    /// Endpoint (relative to the API version prefix) the cookie is scoped to
    pub end_point: String,

    /// Refresh session lifetime and cookie Max-Age, in seconds
    pub max_age_seconds: i64,

    /// Whether the cookie carries the `Secure` attribute
    pub cookie_secure: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            num_bytes: 32,
            end_point: String::from("auth/refresh"),
            max_age_seconds: 604800, // 7 days
            cookie_secure: true,
        }
    }
}

impl RefreshConfig {
    pub(crate) fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            num_bytes: env.parse_or("AUTH_REFRESH_NUM_BYTES", defaults.num_bytes)?,
            end_point: env
                .string_or("AUTH_REFRESH_END_POINT", &defaults.end_point)
                .trim_matches('/')
                .to_string(),
            max_age_seconds: env.parse_or("AUTH_REFRESH_MAX_AGE", defaults.max_age_seconds)?,
            cookie_secure: env.bool_or("AUTH_REFRESH_COOKIE_SECURE", defaults.cookie_secure)?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bytes < MIN_REFRESH_NUM_BYTES {
            return Err(ConfigError::invalid(
                "AUTH_REFRESH_NUM_BYTES",
                format!("must be at least {}", MIN_REFRESH_NUM_BYTES),
            ));
        }
        if self.end_point.is_empty() {
            return Err(ConfigError::missing("AUTH_REFRESH_END_POINT"));
        }
        if self.max_age_seconds <= 0 || self.max_age_seconds > MAX_LIFETIME_SECONDS {
            return Err(ConfigError::invalid(
                "AUTH_REFRESH_MAX_AGE",
                format!("must be between 1 and {} seconds", MAX_LIFETIME_SECONDS),
            ));
        }
        Ok(())
    }
}

/// Which session store implementation backs refresh sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreBackend {
    Memory,
    Redis,
}

impl std::str::FromStr for SessionStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            _ => Err(format!("unknown session store '{}'", s)),
        }
    }
}

/// Session store and lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Store backend
    pub backend: SessionStoreBackend,

    /// How often the cleanup task purges sessions past retention, in seconds
    pub cleanup_interval_seconds: u64,

    /// How long terminal sessions stay readable after expiry, in seconds
    pub retention_seconds: i64,

    /// Identifier generation attempts before session creation fails
    pub create_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionStoreBackend::Memory,
            cleanup_interval_seconds: 300,
            retention_seconds: 86400,
            create_attempts: 3,
        }
    }
}

impl SessionConfig {
    pub(crate) fn from_reader(env: &EnvReader<'_>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            backend: env.parse_or("AUTH_SESSION_STORE", defaults.backend)?,
            cleanup_interval_seconds: env
                .parse_or("AUTH_SESSION_CLEANUP_INTERVAL", defaults.cleanup_interval_seconds)?,
            retention_seconds: env.parse_or("AUTH_SESSION_RETENTION", defaults.retention_seconds)?,
            create_attempts: env.parse_or("AUTH_SESSION_CREATE_ATTEMPTS", defaults.create_attempts)?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.create_attempts == 0 {
            return Err(ConfigError::invalid("AUTH_SESSION_CREATE_ATTEMPTS", "must be at least 1"));
        }
        if self.cleanup_interval_seconds == 0
            || self.cleanup_interval_seconds > MAX_CLEANUP_INTERVAL_SECONDS
        {
            return Err(ConfigError::invalid(
                "AUTH_SESSION_CLEANUP_INTERVAL",
                format!("must be between 1 and {} seconds", MAX_CLEANUP_INTERVAL_SECONDS),
            ));
        }
        if self.retention_seconds < 0 || self.retention_seconds > MAX_LIFETIME_SECONDS {
            return Err(ConfigError::invalid(
                "AUTH_SESSION_RETENTION",
                format!("must be between 0 and {} seconds", MAX_LIFETIME_SECONDS),
            ));
        }
        Ok(())
    }
}
