use crate::config::ConfigSource;
use crate::errors::{GateError, EXIT_PASS};

/// Resolve the full run configuration and print it, secrets excluded.
pub fn handle_validate(source: &ConfigSource) -> Result<i32, GateError> {
    let config = source.driver()?;

    println!("Configuration is valid");
    println!("  Tenable API:     {}", config.tenable.base_url);
    println!("  Target agent:    {}", config.scan.target);
    println!("  Scan name:       {}", config.scan.name);
    if let Some(folder) = config.scan.folder_id {
        println!("  Folder ID:       {}", folder);
    }
    println!("  Export format:   {}", config.scan.export_format);
    println!("  Bucket:          s3://{}/{}/ ({})", config.storage.bucket, config.storage.key_prefix, config.storage.region);
    println!("  High threshold:  {}", config.gate.high_threshold);
    println!(
        "  Polling:         scan every {}s, export every {}s",
        config.polling.scan.interval.as_secs(),
        config.polling.export.interval.as_secs()
    );
    Ok(EXIT_PASS)
}
