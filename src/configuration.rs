use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub cors_origin: Option<String>,
}

/// Deployment environment; controls the `secure` flag on auth cookies.
#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Token-issuance settings.
///
/// Expiries are `<int><ms|s|m|h|d>` strings (e.g. "15m", "7d"); a malformed
/// value surfaces as a configuration error the first time it is used.
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_expiry: String,
    pub refresh_token_expiry: String,
    pub max_refresh_tokens: i64,
}

impl AuthSettings {
    pub fn access_ttl(&self) -> Result<chrono::Duration, crate::error::AppError> {
        crate::duration::parse(&self.access_token_expiry)
    }

    pub fn refresh_ttl(&self) -> Result<chrono::Duration, crate::error::AppError> {
        crate::duration::parse(&self.refresh_token_expiry)
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    settings.try_deserialize::<Settings>()
}
