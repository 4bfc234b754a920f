#![forbid(unsafe_code)]

mod control;
mod error;
mod system;
mod terminate_signal;

pub use control::Control;
pub use error::Error;
pub use system::System;
pub use terminate_signal::TerminateSignal;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Environment variables with this prefix override file values, e.g.
/// `PIDCTL_CONTROL__MAX_SLEEP=30`.
pub const ENV_PREFIX: &str = "PIDCTL_";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub system: System,
    pub control: Control,
}

impl Config {
    /// Defaults merged with `PIDCTL_*` environment overrides. A malformed
    /// override is an error rather than being dropped.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::figment().extract()?)
    }

    /// Load a TOML config file, layered over the defaults and under the
    /// environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(&text))
            .merge(Self::env())
            .extract()?;
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment.
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        Ok(toml_edit::de::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml_edit::ser::to_string_pretty(self)?)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Self::env())
    }

    fn env() -> Env {
        Env::prefixed(ENV_PREFIX).split("__")
    }
}
