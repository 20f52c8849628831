use std::time::Duration;

/// Parses a human-friendly, non-zero duration such as `10s`, `1m30s` or `500ms`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let duration = humantime::parse_duration(value.trim()).map_err(|err| err.to_string())?;
    if duration.is_zero() {
        return Err(format!("duration `{value}` must be greater than zero"));
    }
    Ok(duration)
}
