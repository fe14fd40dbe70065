use anyhow::Error;
use influxdb_line_protocol_writer::{
    config::{get_precision, get_writer_config, validate_env_variables},
    handle_input,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    validate_env_variables()?;
    let config = get_writer_config()?;
    let precision = get_precision()?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let written = handle_input(stdin.lock(), &mut stdout.lock(), &config, &precision)?;
    tracing::debug!("wrote {} lines", written);
    Ok(())
}
