//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Environment variables are unprefixed and matched
//! case-insensitively (`DB_URL`, `MODEM_IP`, ...).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use modemstats_adapters::TelnetSource;
use modemstats_sdk::{InfluxWriter, SinkError};

/// Everything the poller needs to know at startup.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// InfluxDB server, with or without scheme.
    pub db_url: String,
    pub db_token: String,
    pub db_org: String,
    pub db_bucket: String,
    pub modem_ip: String,
    pub modem_port: u16,
    pub modem_username: String,
    pub modem_password: String,
    /// Bound on the connect and each prompt wait. Unset waits forever.
    pub modem_timeout_secs: Option<u64>,
    pub poll_interval_secs: u64,
    /// File receiving one line per cycle failure.
    pub error_log: PathBuf,
    pub log_level: String,
}

impl Settings {
    /// Load settings from defaults, `path` and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, Environment::default())
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("db_url", "localhost:8086")?
            .set_default("db_token", "")?
            .set_default("db_org", "organisation")?
            .set_default("db_bucket", "modemstats")?
            .set_default("modem_ip", "192.168.100.1")?
            .set_default("modem_port", 23i64)?
            .set_default("modem_username", "admin")?
            .set_default("modem_password", "admin")?
            .set_default("poll_interval_secs", 60i64)?
            .set_default("error_log", "errorlog.log")?
            .set_default("log_level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    /// Sleep between the end of one cycle and the start of the next.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn modem_timeout(&self) -> Option<Duration> {
        self.modem_timeout_secs.map(Duration::from_secs)
    }

    /// Telnet source for the configured modem.
    pub fn telnet_source(&self) -> TelnetSource {
        let mut builder = TelnetSource::builder()
            .host(&self.modem_ip)
            .port(self.modem_port)
            .credentials(&self.modem_username, &self.modem_password);
        if let Some(timeout) = self.modem_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    /// InfluxDB writer for the configured bucket.
    pub fn influx_writer(&self) -> Result<InfluxWriter, SinkError> {
        InfluxWriter::builder()
            .url(&self.db_url)
            .token(&self.db_token)
            .org(&self.db_org)
            .bucket(&self.db_bucket)
            .build()
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("db_url", &self.db_url)
            .field("db_token", &redact(&self.db_token))
            .field("db_org", &self.db_org)
            .field("db_bucket", &self.db_bucket)
            .field("modem_ip", &self.modem_ip)
            .field("modem_port", &self.modem_port)
            .field("modem_username", &self.modem_username)
            .field("modem_password", &redact(&self.modem_password))
            .field("modem_timeout_secs", &self.modem_timeout_secs)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("error_log", &self.error_log)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "***"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with(None, env(&[])).unwrap();
        assert_eq!(settings.db_url, "localhost:8086");
        assert_eq!(settings.db_token, "");
        assert_eq!(settings.db_org, "organisation");
        assert_eq!(settings.db_bucket, "modemstats");
        assert_eq!(settings.modem_ip, "192.168.100.1");
        assert_eq!(settings.modem_port, 23);
        assert_eq!(settings.modem_username, "admin");
        assert_eq!(settings.modem_password, "admin");
        assert_eq!(settings.modem_timeout(), None);
        assert_eq!(settings.poll_interval(), Duration::from_secs(60));
        assert_eq!(settings.error_log, PathBuf::from("errorlog.log"));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_environment_overrides() {
        let settings = Settings::load_with(
            None,
            env(&[
                ("DB_URL", "https://influx.lan:8086"),
                ("DB_TOKEN", "0123abc"),
                ("MODEM_IP", "10.0.0.138"),
                ("MODEM_PASSWORD", "1234"),
                ("MODEM_TIMEOUT_SECS", "30"),
                ("POLL_INTERVAL_SECS", "15"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.db_url, "https://influx.lan:8086");
        assert_eq!(settings.db_token, "0123abc");
        assert_eq!(settings.modem_ip, "10.0.0.138");
        assert_eq!(settings.modem_password, "1234");
        assert_eq!(settings.modem_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.poll_interval(), Duration::from_secs(15));
        assert_eq!(settings.db_bucket, "modemstats");
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "db_bucket = \"dsl\"\nmodem_ip = \"192.168.1.1\"\nmodem_port = 2323\nlog_level = \"debug\""
        )
        .unwrap();

        let settings =
            Settings::load_with(Some(file.path()), env(&[("MODEM_IP", "192.168.1.254")])).unwrap();
        assert_eq!(settings.db_bucket, "dsl");
        assert_eq!(settings.modem_port, 2323);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.modem_ip, "192.168.1.254");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Settings::load_with(Some(&path), env(&[])).is_err());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(Settings::load_with(None, env(&[("MODEM_PORT", "telnet")])).is_err());
    }

    #[test]
    fn test_builds_adapters() {
        let settings = Settings::load_with(None, env(&[("MODEM_PORT", "2323")])).unwrap();
        assert_eq!(settings.telnet_source().addr(), "192.168.100.1:2323");
        assert_eq!(
            settings.influx_writer().unwrap().write_url(),
            "http://localhost:8086/api/v2/write"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = Settings::load_with(None, env(&[("DB_TOKEN", "s3cret")])).unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("modem_password: \"***\""));
    }
}
