use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use log::{info, warn};

use crate::errors::{CustomResult, Error};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub admin_user: Option<String>,
    pub admin_pass: Option<String>,
    pub public_dir: PathBuf,
    pub port: u16,
}

impl Config {
    /// # load the config
    /// read the config from the environment, after loading `.env` if present
    pub fn load() -> CustomResult<Config> {
        dotenv().ok();

        let database_url = var("DATABASE_URL").ok_or_else(|| Error::MissingConfig {
            key: "DATABASE_URL".to_string(),
        })?;

        Ok(Config {
            database_url,
            redis_url: var("REDIS_URL"),
            admin_user: var("ADMIN_USER"),
            admin_pass: var("ADMIN_PASS"),
            public_dir: PathBuf::from(var("PUBLIC_DIR").unwrap_or_else(|| "public".to_string())),
            port: try_load("PORT", 3000),
        })
    }

    /// the admin credentials, when both are set
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_user.as_deref(), self.admin_pass.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }
}

/// an environment variable, with empty values treated as unset
fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value ({e}), using default: {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
