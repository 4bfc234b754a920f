#![forbid(unsafe_code)]

//! Environment overrides. Every test runs inside a `figment::Jail`, which
//! serializes access to the process environment.

use config::{Config, Error, TerminateSignal};
use figment::Jail;
use std::time::Duration;

#[test]
fn env_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("PIDCTL_CONTROL__TERMINATE_SIGNAL", "kill");
        jail.set_env("PIDCTL_CONTROL__MAX_SLEEP", "30");

        let config = Config::new().expect("valid overrides");
        assert_eq!(config.control.terminate_signal, TerminateSignal::Kill);
        assert_eq!(config.control.max_sleep, Duration::from_secs(30));
        assert_eq!(config.control.min_sleep, Duration::from_secs(1));
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_reported() {
    Jail::expect_with(|jail| {
        jail.set_env("PIDCTL_CONTROL__TERMINATE_SIGNAL", "kill");
        jail.set_env("PIDCTL_CONTROL__MAX_SLEEP", "abc");

        let err = Config::new().unwrap_err();
        assert!(matches!(err, Error::Extract(_)));
        assert!(err.to_string().contains("max_sleep"));
        Ok(())
    });
}

#[test]
fn env_overrides_file_and_invalid_env_fails_load() {
    Jail::expect_with(|jail| {
        jail.create_file("pidctl.toml", "[control]\nmax_sleep = 20\n")?;
        jail.set_env("PIDCTL_CONTROL__MAX_SLEEP", "25");
        let config = Config::load("pidctl.toml").expect("valid file and env");
        assert_eq!(config.control.max_sleep, Duration::from_secs(25));

        jail.set_env("PIDCTL_CONTROL__MAX_SLEEP", "-");
        assert!(matches!(Config::load("pidctl.toml"), Err(Error::Extract(_))));
        Ok(())
    });
}
