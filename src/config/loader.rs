//! Load [`ServiceConfig`] from environment variables (after `.env`, if the binary loaded one).

use crate::config::types::{DatabaseConfig, ServiceConfig, StoreKind};
use crate::config::validator::{parse_origins, validate_schema_name};
use crate::document::PatchPolicy;
use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let schema = get("DB_SCHEMA").unwrap_or_else(|| "public".into());
        validate_schema_name(&schema)?;
        let max_connections: u32 = parse_or(&get, "DB_MAX_CONNECTIONS", 5)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or(&get, "DB_PORT", 5432)?,
            username: get("DB_USERNAME"),
            password: get("DB_PASSWORD"),
            name: get("DB_NAME").unwrap_or_else(|| "students".into()),
            schema,
            max_connections,
        };

        let cors = parse_origins(get("CORS_ALLOWED_ORIGINS").as_deref().unwrap_or("*"))?;

        Ok(ServiceConfig {
            database,
            store: parse_or(&get, "STUDENT_STORE", StoreKind::Postgres)?,
            patch_policy: parse_or(&get, "PATCH_POLICY", PatchPolicy::Strict)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
            cors,
            max_body_bytes: parse_or(&get, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CorsOrigins;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServiceConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.store, StoreKind::Postgres);
        assert_eq!(cfg.patch_policy, PatchPolicy::Strict);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert_eq!(cfg.cors, CorsOrigins::Any);
        assert_eq!(cfg.database.host, "localhost");
        assert_eq!(cfg.database.schema, "public");
        assert_eq!(cfg.database.url, None);
        assert_eq!(cfg.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn reads_credentials_and_overrides() {
        let cfg = load(&[
            ("DB_HOST", "db.internal"),
            ("DB_USERNAME", "svc"),
            ("DB_PASSWORD", "p@ss/word"),
            ("STUDENT_STORE", "memory"),
            ("PATCH_POLICY", "permissive"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ])
        .unwrap();
        assert_eq!(cfg.database.host, "db.internal");
        assert_eq!(cfg.database.username.as_deref(), Some("svc"));
        assert_eq!(cfg.database.password.as_deref(), Some("p@ss/word"));
        assert_eq!(cfg.store, StoreKind::Memory);
        assert_eq!(cfg.patch_policy, PatchPolicy::Permissive);
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
        match cfg.cors {
            CorsOrigins::List(origins) => assert_eq!(origins.len(), 2),
            other => panic!("expected origin list, got {other:?}"),
        }
        assert!(cfg.database.connect_options().is_ok());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = load(&[("PORT", "  "), ("DB_USERNAME", "")]).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.database.username, None);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ConfigError::Invalid { var: "PORT", .. })));
        assert!(matches!(load(&[("STUDENT_STORE", "mongo")]), Err(ConfigError::Invalid { var: "STUDENT_STORE", .. })));
        assert!(matches!(load(&[("DB_SCHEMA", "drop table")]), Err(ConfigError::Invalid { var: "DB_SCHEMA", .. })));
        assert!(matches!(load(&[("DB_MAX_CONNECTIONS", "0")]), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn database_url_must_parse() {
        let cfg = load(&[("DATABASE_URL", "not a url")]).unwrap();
        assert!(cfg.database.connect_options().is_err());
        let cfg = load(&[("DATABASE_URL", "postgres://u:p@db:5432/school")]).unwrap();
        assert!(cfg.database.connect_options().is_ok());
    }
}
