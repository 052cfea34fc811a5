use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default; only malformed values are errors.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(invalid(var, format!("expected a boolean, got '{raw}'"))),
        }
    };

    let log_level = or_default("NEWSGATE_LOG_LEVEL", "info");
    let profiles_path = PathBuf::from(or_default(
        "NEWSGATE_PROFILES_PATH",
        "./config/profiles.yaml",
    ));
    let shadow_suppression = parse_bool("NEWSGATE_SHADOW_SUPPRESSION", "true")?;

    let dedup_min_common = parse_usize("NEWSGATE_DEDUP_MIN_COMMON", "4")?;
    if dedup_min_common == 0 {
        return Err(invalid(
            "NEWSGATE_DEDUP_MIN_COMMON",
            "must be at least 1".to_string(),
        ));
    }

    let dedup_ratio_threshold = or_default("NEWSGATE_DEDUP_RATIO_THRESHOLD", "0.75")
        .parse::<f64>()
        .map_err(|e| invalid("NEWSGATE_DEDUP_RATIO_THRESHOLD", e.to_string()))?;
    if !(dedup_ratio_threshold > 0.0 && dedup_ratio_threshold <= 1.0) {
        return Err(invalid(
            "NEWSGATE_DEDUP_RATIO_THRESHOLD",
            format!("{dedup_ratio_threshold} is outside (0, 1]"),
        ));
    }

    let snippet_limit = parse_usize("NEWSGATE_SNIPPET_LIMIT", "800")?;

    Ok(AppConfig {
        log_level,
        profiles_path,
        shadow_suppression,
        dedup_min_common,
        dedup_ratio_threshold,
        snippet_limit,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
