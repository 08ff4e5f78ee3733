use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one ratio and one category are configured
/// - Every category names at least one region and no name repeats
/// - The studio base URL is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.campaign.ratios.is_empty() {
        return Err(ConfigError::ValidationError(
            "campaign.ratios cannot be empty".to_string(),
        ));
    }

    if config.campaign.categories.is_empty() {
        return Err(ConfigError::ValidationError(
            "campaign.categories cannot be empty".to_string(),
        ));
    }

    for (idx, category) in config.campaign.categories.iter().enumerate() {
        if category.regions.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "category '{}' has no regions",
                category.name
            )));
        }
        if config.campaign.categories[..idx]
            .iter()
            .any(|c| c.name == category.name)
        {
            return Err(ConfigError::ValidationError(format!(
                "duplicate category '{}'",
                category.name
            )));
        }
    }

    if config.studio.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "studio.base_url cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    const VALID: &str = r#"
[campaign]
ratios = ["1:1"]
headline = "Discover more"

[[campaign.categories]]
name = "fragrances"
regions = ["US"]

[studio]
base_url = "https://studio.test"
api_key = "secret"
"#;

    #[test]
    fn test_validate_valid_config() {
        let config = load_config_from_str(VALID).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_ratios_fails() {
        let mut config = load_config_from_str(VALID).unwrap();
        config.campaign.ratios.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("ratios"));
    }

    #[test]
    fn test_validate_category_without_regions_fails() {
        let mut config = load_config_from_str(VALID).unwrap();
        config.campaign.categories[0].regions.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("no regions"));
    }

    #[test]
    fn test_validate_duplicate_category_fails() {
        let mut config = load_config_from_str(VALID).unwrap();
        let dup = config.campaign.categories[0].clone();
        config.campaign.categories.push(dup);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate category"));
    }

    #[test]
    fn test_validate_empty_base_url_fails() {
        let mut config = load_config_from_str(VALID).unwrap();
        config.studio.base_url.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }
}
