//! Configuration for the mapper and the synthetic data factory
//!
//! Provides a builder pattern for both.

/// Configuration for type mapping and attribute ordering
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Bound used for text columns without a metadata override (default: 100)
    pub default_text_length: u32,
    /// Column type keyword for text columns (default: "varchar")
    pub text_type: String,
    /// Case-insensitive name fragments marking identifier attributes (default: "id", "no")
    pub identifier_markers: Vec<String>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        MapperConfigBuilder::new().build()
    }
}

impl MapperConfig {
    /// Create a new configuration builder
    pub fn builder() -> MapperConfigBuilder {
        MapperConfigBuilder::new()
    }

    /// Whether an attribute name denotes a row identifier
    pub fn is_identifier(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.identifier_markers
            .iter()
            .any(|marker| lowered.contains(marker.as_str()))
    }
}

/// Builder for MapperConfig
#[derive(Debug)]
pub struct MapperConfigBuilder {
    default_text_length: u32,
    text_type: String,
    identifier_markers: Vec<String>,
}

impl Default for MapperConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapperConfigBuilder {
    pub fn new() -> Self {
        Self {
            default_text_length: 100,
            text_type: "varchar".to_string(),
            identifier_markers: vec!["id".to_string(), "no".to_string()],
        }
    }

    /// Set the default text column bound (default: 100)
    pub fn default_text_length(mut self, length: u32) -> Self {
        self.default_text_length = length;
        self
    }

    /// Set the text column type keyword (default: "varchar")
    pub fn text_type(mut self, keyword: impl Into<String>) -> Self {
        self.text_type = keyword.into();
        self
    }

    /// Replace the identifier markers; markers are matched lower-cased
    pub fn identifier_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_markers = markers
            .into_iter()
            .map(|m| m.into().to_lowercase())
            .collect();
        self
    }

    pub fn build(self) -> MapperConfig {
        MapperConfig {
            default_text_length: self.default_text_length,
            text_type: self.text_type,
            identifier_markers: self.identifier_markers,
        }
    }
}

/// Configuration for synthetic value generation
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Length of random strings (default: 20)
    pub text_length: usize,
    /// Upper bound of random integers, inclusive (default: 10000)
    pub max_random_int: i32,
    /// Upper bound of generated identifiers, inclusive (default: 100)
    pub max_id: i32,
    /// Generated dates fall within this many days from today (default: 60)
    pub date_window_days: i64,
    /// Number of dates in the date pool (default: 20)
    pub date_pool_size: usize,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            text_length: 20,
            max_random_int: 10000,
            max_id: 100,
            date_window_days: 60,
            date_pool_size: 20,
        }
    }
}

impl SyntheticConfig {
    pub fn builder() -> SyntheticConfigBuilder {
        SyntheticConfigBuilder {
            config: SyntheticConfig::default(),
        }
    }
}

/// Builder for SyntheticConfig
#[derive(Debug)]
pub struct SyntheticConfigBuilder {
    config: SyntheticConfig,
}

impl SyntheticConfigBuilder {
    pub fn text_length(mut self, length: usize) -> Self {
        self.config.text_length = length;
        self
    }

    pub fn max_random_int(mut self, max: i32) -> Self {
        self.config.max_random_int = max;
        self
    }

    pub fn max_id(mut self, max: i32) -> Self {
        self.config.max_id = max;
        self
    }

    pub fn date_window_days(mut self, days: i64) -> Self {
        self.config.date_window_days = days;
        self
    }

    pub fn date_pool_size(mut self, size: usize) -> Self {
        self.config.date_pool_size = size;
        self
    }

    pub fn build(self) -> SyntheticConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MapperConfig Tests
    // =========================================================================

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.default_text_length, 100);
        assert_eq!(config.text_type, "varchar");
        assert_eq!(config.identifier_markers, vec!["id", "no"]);
    }

    #[test]
    fn test_builder_overrides() {
        let config = MapperConfig::builder()
            .default_text_length(255)
            .text_type("nvarchar")
            .identifier_markers(["KEY"])
            .build();

        assert_eq!(config.default_text_length, 255);
        assert_eq!(config.text_type, "nvarchar");
        assert_eq!(config.identifier_markers, vec!["key"]);
    }

    #[test]
    fn test_identifier_heuristic_is_case_insensitive() {
        let config = MapperConfig::default();
        assert!(config.is_identifier("id"));
        assert!(config.is_identifier("studentID"));
        assert!(config.is_identifier("serialNo"));
        assert!(config.is_identifier("Notes")); // substring match
        assert!(!config.is_identifier("label"));
        assert!(!config.is_identifier("price"));
    }

    #[test]
    fn test_custom_markers() {
        let config = MapperConfig::builder().identifier_markers(["code"]).build();
        assert!(config.is_identifier("zipCode"));
        assert!(!config.is_identifier("id"));
    }

    #[test]
    fn test_config_clone() {
        let config1 = MapperConfig::builder().default_text_length(10).build();
        let config2 = config1.clone();
        assert_eq!(config1.default_text_length, config2.default_text_length);
    }

    // =========================================================================
    // SyntheticConfig Tests
    // =========================================================================

    #[test]
    fn test_synthetic_defaults() {
        let config = SyntheticConfig::default();
        assert_eq!(config.text_length, 20);
        assert_eq!(config.max_random_int, 10000);
        assert_eq!(config.max_id, 100);
        assert_eq!(config.date_window_days, 60);
        assert_eq!(config.date_pool_size, 20);
    }

    #[test]
    fn test_synthetic_builder() {
        let config = SyntheticConfig::builder()
            .text_length(5)
            .max_random_int(9)
            .max_id(3)
            .date_window_days(7)
            .date_pool_size(2)
            .build();

        assert_eq!(config.text_length, 5);
        assert_eq!(config.max_random_int, 9);
        assert_eq!(config.max_id, 3);
        assert_eq!(config.date_window_days, 7);
        assert_eq!(config.date_pool_size, 2);
    }

    #[test]
    fn test_builder_debug() {
        let debug_str = format!("{:?}", MapperConfig::builder());
        assert!(debug_str.contains("MapperConfigBuilder"));
    }
}
