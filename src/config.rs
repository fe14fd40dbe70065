use anyhow::{anyhow, Error, Result};
use log::trace;
use std::time::Instant;

const INTEGER_SUFFIX_ENV: &str = "integer_suffix";
const TRIM_WHOLE_FLOATS_ENV: &str = "trim_whole_floats";
const PRECISION_ENV: &str = "precision";

/// Rendering policy for numeric field values.
///
/// The defaults produce what InfluxDB ingestion expects: integers carry the
/// trailing `i` marker and whole floats are written without `.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    pub integer_suffix: bool,
    pub trim_whole_floats: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            integer_suffix: true,
            trim_whole_floats: true,
        }
    }
}

/// Unit of incoming timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    #[default]
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

impl Precision {
    pub fn parse(value: &str) -> Result<Precision, Error> {
        match value.to_lowercase().as_str() {
            "ns" => Ok(Precision::Nanoseconds),
            "us" => Ok(Precision::Microseconds),
            "ms" => Ok(Precision::Milliseconds),
            "s" => Ok(Precision::Seconds),
            other => Err(anyhow!(
                "precision can only be ns, us, ms or s, got {}",
                other
            )),
        }
    }

    pub fn to_nanoseconds(self, timestamp: i64) -> Result<i64, Error> {
        // Scales a timestamp in this precision to nanoseconds

        let factor: i64 = match self {
            Precision::Nanoseconds => 1,
            Precision::Microseconds => 1_000,
            Precision::Milliseconds => 1_000_000,
            Precision::Seconds => 1_000_000_000,
        };
        timestamp
            .checked_mul(factor)
            .ok_or_else(|| anyhow!("timestamp {} overflows nanoseconds at {:?}", timestamp, self))
    }
}

pub fn get_writer_config() -> Result<WriterConfig, Error> {
    // Get the populated writer config, falling back to defaults for unset variables

    let function_start = Instant::now();
    let defaults = WriterConfig::default();

    let config = WriterConfig {
        integer_suffix: optional_bool_env(INTEGER_SUFFIX_ENV)?.unwrap_or(defaults.integer_suffix),
        trim_whole_floats: optional_bool_env(TRIM_WHOLE_FLOATS_ENV)?
            .unwrap_or(defaults.trim_whole_floats),
    };

    trace!("get_writer_config duration: {:?}", function_start.elapsed());
    Ok(config)
}

pub fn get_precision() -> Result<Precision, Error> {
    match std::env::var(PRECISION_ENV) {
        Ok(value) => Precision::parse(&value),
        Err(_) => Ok(Precision::default()),
    }
}

pub fn env_var_to_bool(env_var: &str) -> Option<bool> {
    // Convert the env var to bool, None when it is neither truthy nor falsy

    match env_var.to_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

pub fn validate_env_variables() -> Result<(), Error> {
    // Validate the optional writer environment variables

    let function_start = Instant::now();

    optional_bool_env(INTEGER_SUFFIX_ENV)?;
    optional_bool_env(TRIM_WHOLE_FLOATS_ENV)?;
    get_precision()?;

    trace!(
        "validate_env_variables duration: {:?}",
        function_start.elapsed()
    );
    Ok(())
}

fn optional_bool_env(name: &str) -> Result<Option<bool>, Error> {
    match std::env::var(name) {
        Ok(value) => match env_var_to_bool(&value) {
            Some(flag) => Ok(Some(flag)),
            None => Err(anyhow!(
                "{} environment variable must be true or false, got {}",
                name,
                value
            )),
        },
        Err(_) => Ok(None),
    }
}
