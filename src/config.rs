use crate::errors::StartupError;

/// Process configuration, read once at startup and handed to the services
/// through `web::Data` instead of ambient `std::env` lookups.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, StartupError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| StartupError::Config("DATABASE_URL must be set"))?;
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| StartupError::Config("JWT_SECRET must be set"))?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| StartupError::Config("PORT must be a valid port number"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: format!("127.0.0.1:{port}"),
            max_connections: 5,
        })
    }
}
