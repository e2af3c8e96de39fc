//! Config value checks that need more than `FromStr`.

use crate::config::types::CorsOrigins;
use crate::error::ConfigError;
use axum::http::HeaderValue;
use regex::Regex;

/// Schema name is interpolated into DDL, so it must be a plain PostgreSQL identifier.
pub fn validate_schema_name(schema: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").map_err(|e| ConfigError::Invalid {
        var: "DB_SCHEMA",
        reason: e.to_string(),
    })?;
    if !re.is_match(schema) {
        return Err(ConfigError::Invalid {
            var: "DB_SCHEMA",
            reason: format!("'{}' is not a valid identifier", schema),
        });
    }
    Ok(())
}

/// `*` allows any origin; otherwise a comma-separated list of origins.
pub fn parse_origins(raw: &str) -> Result<CorsOrigins, ConfigError> {
    let entries: Vec<&str> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    if entries.is_empty() || entries.contains(&"*") {
        return Ok(CorsOrigins::Any);
    }
    let origins = entries
        .into_iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|_| ConfigError::Invalid {
                var: "CORS_ALLOWED_ORIGINS",
                reason: format!("'{}' is not a valid origin", o),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsOrigins::List(origins))
}
