//! Configuration validation rules.

use super::schema::Config;

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if config.gateway.host.trim().is_empty() {
        errors.push("gateway.host must not be empty".to_string());
    }
    if config.gateway.allowed_origins.is_empty() {
        errors.push("gateway.allowed_origins must not be empty".to_string());
    }
    for origin in &config.gateway.allowed_origins {
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            errors.push(format!(
                "gateway.allowed_origins entry '{}' must be an http(s) origin",
                origin
            ));
        }
    }
    if config.gateway.system_prompt.trim().is_empty() {
        errors.push("gateway.system_prompt must not be empty".to_string());
    }

    if config.provider.api_base.trim().is_empty() {
        errors.push("provider.api_base must not be empty".to_string());
    }
    if config.provider.model.trim().is_empty() {
        errors.push("provider.model must not be empty".to_string());
    }
    if config.provider.max_tokens == 0 {
        errors.push("provider.max_tokens must be > 0".to_string());
    }
    if !(0.0..=2.0).contains(&config.provider.temperature) {
        errors.push("provider.temperature must be in [0.0, 2.0]".to_string());
    }

    if config.limits.question_limit == 0 {
        errors.push("limits.question_limit must be > 0".to_string());
    }
    if config.limits.window_secs == 0 {
        errors.push("limits.window_secs must be > 0".to_string());
    }
    // One evictable turn below the seed is the useful minimum.
    if config.limits.max_history < 2 {
        errors.push("limits.max_history must be >= 2".to_string());
    }

    if config.cache.static_partition.trim().is_empty() {
        errors.push("cache.static_partition must not be empty".to_string());
    }
    if config.cache.dynamic_partition.trim().is_empty() {
        errors.push("cache.dynamic_partition must not be empty".to_string());
    }
    if config.cache.static_partition == config.cache.dynamic_partition {
        errors.push("cache partitions must have distinct names".to_string());
    }
    if config.cache.max_dynamic_entries == 0 {
        errors.push("cache.max_dynamic_entries must be > 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_rejects_equal_partition_names() {
        let mut config = Config::default();
        config.cache.dynamic_partition = config.cache.static_partition.clone();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }

    #[test]
    fn test_rejects_bad_origin() {
        let mut config = Config::default();
        config.gateway.allowed_origins = vec!["gammac.vercel.app".to_string()];
        assert!(validate_config(&config).is_err());
    }
}
