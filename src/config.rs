//! Runtime configuration, read from the environment (and `.env`).

use std::{env, fmt};

use anyhow::Context;

const DEFAULT_DATABASE_URL: &str = "sqlite:sport.db?mode=rwc";
const DEFAULT_LOG_FILTER: &str = "sport=info,sea_orm=warn";

#[derive(Clone)]
pub struct Credentials {
  pub login: String,
  pub password: String,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("login", &self.login)
      .field("password", &"***")
      .finish()
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  /// Administrator created on start-up when the login does not exist yet.
  pub admin: Option<Credentials>,
  /// bcrypt work factor for stored passwords.
  pub hash_cost: u32,
  /// Used when `RUST_LOG` is not set.
  pub log_filter: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from(DEFAULT_DATABASE_URL),
      admin: None,
      hash_cost: bcrypt::DEFAULT_COST,
      log_filter: String::from(DEFAULT_LOG_FILTER),
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup(
    var: impl Fn(&str) -> Option<String>,
  ) -> anyhow::Result<Self> {
    let defaults = Self::default();

    let admin = match (var("ADMIN_LOGIN"), var("ADMIN_PASSWORD")) {
      (Some(login), Some(password)) if !login.trim().is_empty() => {
        Some(Credentials { login, password })
      }
      (Some(_), None) => {
        anyhow::bail!("ADMIN_LOGIN is set but ADMIN_PASSWORD is not")
      }
      _ => None,
    };

    let hash_cost = match var("BCRYPT_COST") {
      Some(cost) => cost.trim().parse().context("Invalid BCRYPT_COST")?,
      None => defaults.hash_cost,
    };

    Ok(Self {
      database_url: var("DATABASE_URL").unwrap_or(defaults.database_url),
      admin,
      hash_cost,
      log_filter: var("LOG_FILTER").unwrap_or(defaults.log_filter),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::HashMap;

  fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect();
    move |key| vars.get(key).cloned()
  }

  #[test]
  fn defaults_without_env() {
    let config = Config::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert!(config.admin.is_none());
    assert_eq!(config.hash_cost, bcrypt::DEFAULT_COST);
  }

  #[test]
  fn reads_admin_and_cost() {
    let config = Config::from_lookup(lookup(&[
      ("DATABASE_URL", "sqlite::memory:"),
      ("ADMIN_LOGIN", "root"),
      ("ADMIN_PASSWORD", "hunter2"),
      ("BCRYPT_COST", "6"),
    ]))
    .unwrap();

    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.hash_cost, 6);
    let admin = config.admin.unwrap();
    assert_eq!(admin.login, "root");
    assert!(!format!("{admin:?}").contains("hunter2"));
  }

  #[test]
  fn rejects_half_configured_admin() {
    assert!(Config::from_lookup(lookup(&[("ADMIN_LOGIN", "root")])).is_err());
    assert!(Config::from_lookup(lookup(&[("BCRYPT_COST", "many")])).is_err());
  }
}
