use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_sources(std::env::var("PORT").ok())
    }

    /// Builds the config from the optional `configuration` file and `APP__*`
    /// variables. A bare `PORT` value wins over both.
    fn from_sources(port: Option<String>) -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .set_override_option("port", port.filter(|p| !p.trim().is_empty()))?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
