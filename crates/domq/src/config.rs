//! Page configuration

/// Settings shared by every selection on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Display value `show()` applies
    pub default_display: String,
    /// Document URL, also the base for relative request URLs
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_display: "block".to_string(),
            base_url: "about:blank".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_display(mut self, display: &str) -> Self {
        self.default_display = display.to_string();
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_display, "block");
        assert_eq!(config.base_url, "about:blank");
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new()
            .with_default_display("flex")
            .with_base_url("https://example.com/");
        assert_eq!(config.default_display, "flex");
        assert_eq!(config.base_url, "https://example.com/");
    }
}
