use crate::error::CliError;

/// Validate that a base URL is usable before a client is built from it.
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Reject an inverted score window before it is serialized into
/// filters.
pub fn validate_score_bounds(min: Option<f64>, max: Option<f64>) -> crate::Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(CliError::InvalidArguments(format!(
                "--min-score ({}) must not exceed --max-score ({})",
                min, max
            ))
            .into());
        }
    }
    Ok(())
}
