//! Watcher configuration.
//!
//! All knobs live in one immutable [`WatchConfig`] injected at construction
//! time; nothing reads process-wide state.

use serde::{Deserialize, Serialize};

/// Default booking page, the DGT appointment-request form.
pub const DEFAULT_BASE_URL: &str =
    "https://sedeclave.dgt.gob.es/WEB_NCIT_CONSULTA/solicitarCita.faces";

/// Immutable search configuration for one watcher.
///
/// # Examples
///
/// ```rust
/// use citawatch::WatchConfig;
///
/// let config = WatchConfig::new("Madrid", "Canje de permiso de conducción")
///     .with_country("Perú");
///
/// assert_eq!(config.office(), "Madrid");
/// assert_eq!(config.country(), Some("Perú"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    office: String,
    procedure: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    captcha_api_key: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl WatchConfig {
    /// Create a configuration for the given office and procedure type.
    pub fn new(office: impl Into<String>, procedure: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            office: office.into(),
            procedure: procedure.into(),
            country: None,
            captcha_api_key: None,
        }
    }

    /// Set the country field (only some procedure types require one).
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Point the watcher at a different booking page.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// API key for an external CAPTCHA-solving service, if the session
    /// implementation uses one.
    pub fn with_captcha_api_key(mut self, key: impl Into<String>) -> Self {
        self.captcha_api_key = Some(key.into());
        self
    }

    /// The booking page URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The office to search.
    pub fn office(&self) -> &str {
        &self.office
    }

    /// The procedure type to search.
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// The country field value, if any.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// The CAPTCHA-service API key, if any.
    pub fn captcha_api_key(&self) -> Option<&str> {
        self.captcha_api_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = WatchConfig::new("Madrid", "Canje de permiso de conducción");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.country(), None);
        assert_eq!(config.captcha_api_key(), None);
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: WatchConfig = serde_json::from_str(
            r#"{"office": "Madrid", "procedure": "Canje de permiso de conducción"}"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.office(), "Madrid");
    }

    #[test]
    fn test_round_trip() {
        let config = WatchConfig::new("Barcelona", "Duplicado del permiso")
            .with_country("Argentina")
            .with_captcha_api_key("k-123");
        let json = serde_json::to_string(&config).unwrap();
        let back: WatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
