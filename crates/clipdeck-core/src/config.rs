use crate::app_config::{AppConfig, Environment};
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
/// Every integration credential is optional: a missing credential disables
/// that integration (see [`crate::Capabilities`]) instead of failing startup.
/// Empty strings are treated as unset.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let bind_addr = or_default("CLIPDECK_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("CLIPDECK_BIND_ADDR", e.to_string()))?;

    let http_timeout_secs = or_default("CLIPDECK_HTTP_TIMEOUT_SECS", "120")
        .parse::<u64>()
        .map_err(|e| invalid("CLIPDECK_HTTP_TIMEOUT_SECS", e.to_string()))?;
    if http_timeout_secs == 0 {
        return Err(invalid(
            "CLIPDECK_HTTP_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let env = parse_environment(&or_default("CLIPDECK_ENV", "development"))?;
    let log_level = or_default("CLIPDECK_LOG_LEVEL", "info");
    let scheduler_enabled = parse_bool(
        "CLIPDECK_SCHEDULER_ENABLED",
        &or_default("CLIPDECK_SCHEDULER_ENABLED", "true"),
    )?;

    let daily_cron = or_default("CLIPDECK_DAILY_CRON", "0 0 9 * * *");
    let cron_fields = daily_cron.split_whitespace().count();
    if !(6..=7).contains(&cron_fields) {
        return Err(invalid(
            "CLIPDECK_DAILY_CRON",
            format!("expected 6 or 7 cron fields, got {cron_fields}"),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        apify_token: optional("APIFY_TOKEN"),
        apify_actor: or_default("APIFY_TIKTOK_SEARCH_ACTOR", "apify/tiktok-search-scraper"),
        apify_base_url: or_default("APIFY_BASE_URL", "https://api.apify.com/v2"),
        upstash_redis_rest_url: optional("UPSTASH_REDIS_REST_URL"),
        upstash_redis_rest_token: optional("UPSTASH_REDIS_REST_TOKEN"),
        tiktok_access_token: optional("TIKTOK_ACCESS_TOKEN"),
        tiktok_client_key: optional("TIKTOK_CLIENT_KEY"),
        tiktok_client_secret: optional("TIKTOK_CLIENT_SECRET"),
        tiktok_publisher_id: optional("TIKTOK_PUBLISHER_ID"),
        tiktok_api_base_url: or_default("TIKTOK_API_BASE_URL", "https://open.tiktokapis.com"),
        daily_trigger_secret: optional("DAILY_TRIGGER_SECRET"),
        daily_cron,
        scheduler_enabled,
        http_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CLIPDECK_ENV".to_string(),
            reason: format!("expected development, test or production, got \"{other}\""),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
