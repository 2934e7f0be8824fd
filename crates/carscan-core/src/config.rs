use crate::app_config::{AppConfig, DelayRange, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

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
/// Every variable has a default, so an empty environment yields a usable
/// config. The lookup is injectable so tests can use a plain `HashMap`.
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

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let parse_delay = |var: &str, default: &str| -> Result<DelayRange, ConfigError> {
        parse_delay_range(&or_default(var, default)).map_err(|reason| invalid(var, reason))
    };

    let env = parse_environment(&or_default("CARSCAN_ENV", "development"))?;
    let log_level = or_default("CARSCAN_LOG_LEVEL", "info");
    let targets_path = PathBuf::from(or_default("CARSCAN_TARGETS_PATH", "./config/targets.yaml"));
    let output_dir = PathBuf::from(or_default("CARSCAN_OUTPUT_DIR", "./data"));

    let brand = or_default("CARSCAN_BRAND", "Maruti Suzuki");
    if brand.trim().is_empty() {
        return Err(invalid("CARSCAN_BRAND", "brand must be non-empty".to_string()));
    }

    let scraper_request_timeout_secs = parse_u64("CARSCAN_SCRAPER_REQUEST_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default("CARSCAN_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);

    let scraper_max_attempts = parse_u32("CARSCAN_SCRAPER_MAX_ATTEMPTS", "3")?;
    if scraper_max_attempts == 0 {
        return Err(invalid(
            "CARSCAN_SCRAPER_MAX_ATTEMPTS",
            "at least one attempt is required".to_string(),
        ));
    }

    let scraper_retry_delay = parse_delay("CARSCAN_SCRAPER_RETRY_DELAY_MS", "2000-5000")?;
    let scraper_fragment_delay = parse_delay("CARSCAN_SCRAPER_FRAGMENT_DELAY_MS", "500-1500")?;
    let scraper_location_delay = parse_delay("CARSCAN_SCRAPER_LOCATION_DELAY_MS", "2000-4000")?;
    let scraper_max_fragments = parse_usize("CARSCAN_SCRAPER_MAX_FRAGMENTS", "20")?;
    let sample_size = parse_usize("CARSCAN_SAMPLE_SIZE", "100")?;
    let sample_on_empty = parse_bool("CARSCAN_SAMPLE_ON_EMPTY", "true")?;
    let top_n = parse_usize("CARSCAN_TOP_N", "5")?;

    Ok(AppConfig {
        env,
        log_level,
        targets_path,
        output_dir,
        brand,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_attempts,
        scraper_retry_delay,
        scraper_fragment_delay,
        scraper_location_delay,
        scraper_max_fragments,
        sample_size,
        sample_on_empty,
        top_n,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CARSCAN_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Parses `"500-1500"` into a [`DelayRange`]. A single number is a fixed delay.
fn parse_delay_range(raw: &str) -> Result<DelayRange, String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u64>()
            .map_err(|e| format!("\"{part}\": {e}"))
    };

    let (min_ms, max_ms) = match raw.split_once('-') {
        Some((min, max)) => (parse(min)?, parse(max)?),
        None => {
            let fixed = parse(raw)?;
            (fixed, fixed)
        }
    };

    if min_ms > max_ms {
        return Err(format!("lower bound {min_ms} exceeds upper bound {max_ms}"));
    }
    Ok(DelayRange::new(min_ms, max_ms))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
