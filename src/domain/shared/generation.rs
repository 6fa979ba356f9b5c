/// Highest sampling temperature forwarded to the language model
pub const MAX_TEMPERATURE: f64 = 2.0;

/// Check the sampling parameters shared by every language-model request
pub fn validate_generation_params(temperature: f64, max_tokens: u32) -> Result<(), String> {
    if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(format!(
            "temperature must be between 0.0 and {}, got {}",
            MAX_TEMPERATURE, temperature
        ));
    }
    if max_tokens == 0 {
        return Err("max_tokens must be greater than zero".to_string());
    }
    Ok(())
}

/// Pick the requested model, or the configured default when none was given
pub fn resolve_model(requested: Option<&str>, default_model: &str) -> Result<String, String> {
    match requested.map(str::trim) {
        None => Ok(default_model.to_string()),
        Some("") => Err("model cannot be empty".to_string()),
        Some(model) => Ok(model.to_string()),
    }
}
