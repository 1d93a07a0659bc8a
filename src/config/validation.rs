use crate::config::types::{CompileConfig, Config, CrawlerConfig, SiteConfig, StoreConfig};
use crate::convert::MarkdownOptions;
use crate::crawler::label_selector;
use crate::ConfigError;
use scraper::Selector;

/// Longest accepted delay between fetches (milliseconds)
const MAX_REQUEST_DELAY: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_store_config(&config.store)?;
    validate_compile_config(&config.compile)?;
    validate_markdown_options(&config.markdown)?;
    Ok(())
}

/// Validates the site description
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let root = config.root_url()?;

    if !matches!(root.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "Site root '{}' must use http or https",
            config.root
        )));
    }

    if root.query().is_some() || root.fragment().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "Site root '{}' must not have a query or fragment",
            config.root
        )));
    }

    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "At least one seed pathname is required".to_string(),
        ));
    }

    validate_selector(&config.content_selector)?;
    validate_selector(&config.hidden_selector)?;

    for label in [&config.next_label, &config.prev_label] {
        if label.is_empty() {
            return Err(ConfigError::Validation(
                "Navigation labels cannot be empty".to_string(),
            ));
        }
        validate_selector(&label_selector(label))?;
    }

    Ok(())
}

fn validate_selector(selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(
            "Selector cannot be empty".to_string(),
        ));
    }

    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_delay > MAX_REQUEST_DELAY {
        return Err(ConfigError::Validation(format!(
            "request_delay must be <= {}ms, got {}ms",
            MAX_REQUEST_DELAY, config.request_delay
        )));
    }

    if config.timeout < 1 || config.timeout > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout must be between 1 and 300 seconds, got {}",
            config.timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.root.is_empty() {
        return Err(ConfigError::Validation(
            "store root cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates compile configuration
fn validate_compile_config(config: &CompileConfig) -> Result<(), ConfigError> {
    if config.output_path.is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    if config.title.contains('\n') {
        return Err(ConfigError::Validation(
            "title must be a single line".to_string(),
        ));
    }

    Ok(())
}

/// Validates Markdown output options
fn validate_markdown_options(options: &MarkdownOptions) -> Result<(), ConfigError> {
    if !matches!(options.bullet_marker.as_str(), "*" | "-" | "+") {
        return Err(ConfigError::Validation(format!(
            "bullet_marker must be one of '*', '-', '+', got '{}'",
            options.bullet_marker
        )));
    }

    if !matches!(options.em_delimiter.as_str(), "_" | "*") {
        return Err(ConfigError::Validation(format!(
            "em_delimiter must be '_' or '*', got '{}'",
            options.em_delimiter
        )));
    }

    if !matches!(options.strong_delimiter.as_str(), "**" | "__") {
        return Err(ConfigError::Validation(format!(
            "strong_delimiter must be '**' or '__', got '{}'",
            options.strong_delimiter
        )));
    }

    if !matches!(options.fence.as_str(), "```" | "~~~") {
        return Err(ConfigError::Validation(format!(
            "fence must be ``` or ~~~, got '{}'",
            options.fence
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::Pathname;

    #[test]
    fn test_default_config_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_site_root() {
        let mut config = Config::default();
        config.site.root = "ftp://valibot.dev".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.root = "https://valibot.dev/?lang=en".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.site.root = "valibot.dev".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_seeds_required() {
        let mut config = Config::default();
        config.site.seeds.clear();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.site.seeds.push(Pathname::parse("/").unwrap());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_selectors() {
        let mut config = Config::default();
        config.site.hidden_selector = "[aria-hidden=".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidSelector(_))));

        config.site.hidden_selector = "  ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidSelector(_))));
    }

    #[test]
    fn test_validate_labels() {
        let mut config = Config::default();
        config.site.next_label = String::new();
        assert!(validate(&config).is_err());

        config.site.next_label = "Weiter \"zur\" nächsten Seite".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_crawler_config() {
        let mut config = Config::default();
        config.crawler.request_delay = 60_001;
        assert!(validate(&config).is_err());

        config.crawler.request_delay = 0;
        assert!(validate(&config).is_ok());

        config.crawler.timeout = 0;
        assert!(validate(&config).is_err());

        config.crawler.timeout = 301;
        assert!(validate(&config).is_err());

        config.crawler.timeout = 30;
        config.crawler.user_agent = " ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_paths() {
        let mut config = Config::default();
        config.store.root = String::new();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.compile.output_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_markdown_options() {
        let mut config = Config::default();
        config.markdown.bullet_marker = "-".to_string();
        assert!(validate(&config).is_ok());

        config.markdown.bullet_marker = "•".to_string();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.markdown.fence = "''".to_string();
        assert!(validate(&config).is_err());
    }
}
