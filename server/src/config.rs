use std::path::PathBuf;

use error_stack::{Report, ResultExt};
use kernel::KernelError;

static SERVER_PORT: &str = "SERVER_PORT";
static LOG_DIR: &str = "LOG_DIR";
static RUST_LOG: &str = "RUST_LOG";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_DIR: &str = "./logs/";
const DEFAULT_LOG_FILTER: &str =
    "driver=debug,application=debug,server=debug,tower_http=debug,sqlx=info";

/// Server settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub log_dir: PathBuf,
    pub log_filter: String,
}

impl ServerConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> error_stack::Result<Self, KernelError> {
        let port = match lookup(SERVER_PORT) {
            Some(port) => port
                .parse::<u16>()
                .map_err(|error| Report::new(error).change_context(KernelError::Internal))
                .attach_printable_lazy(|| {
                    format!("Env {SERVER_PORT} has an invalid value: {port}")
                })?,
            None => DEFAULT_PORT,
        };
        let log_dir =
            lookup(LOG_DIR).map_or_else(|| PathBuf::from(DEFAULT_LOG_DIR), PathBuf::from);
        let log_filter = lookup(RUST_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            port,
            log_dir,
            log_filter,
        })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use kernel::KernelError;

    use super::ServerConfig;

    #[test]
    fn defaults_apply() -> error_stack::Result<(), KernelError> {
        let config = ServerConfig::from_lookup(|_| None)?;
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_dir, PathBuf::from("./logs/"));
        assert!(config.log_filter.contains("application=debug"));
        Ok(())
    }

    #[test]
    fn overrides_and_bad_port() -> error_stack::Result<(), KernelError> {
        let env = HashMap::from([("SERVER_PORT", "9000"), ("LOG_DIR", "/tmp/bookstore")]);
        let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))?;
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/bookstore"));

        let broken = ServerConfig::from_lookup(|key| {
            (key == "SERVER_PORT").then(|| "eighty".to_string())
        });
        assert!(broken.is_err());
        Ok(())
    }
}
