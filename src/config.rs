//! Paginator configuration.
//!
//! Defaults can be loaded once at startup from the environment and then
//! passed explicitly to every paginator; nothing in the crate reads the
//! environment on its own.

/// Environment variable holding the default minimum record count.
pub const ENV_MINIMUM_RECORDS: &str = "ALPHABAR_MINIMUM_RECORDS";

/// Environment variable toggling the `All` bucket.
pub const ENV_ALL_OPTION: &str = "ALPHABAR_ALL_OPTION";

/// Environment variable naming the query parameter used by navigation links.
pub const ENV_GROUP_PARAM: &str = "ALPHABAR_GROUP_PARAM";

/// Query parameter used by navigation links when none is configured.
pub const DEFAULT_GROUP_PARAM: &str = "ltr";

/// Configuration shared by paginators and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphabarConfig {
    /// Below this many records bucketing is skipped and the navigation is
    /// hidden. `None` always buckets.
    pub min_records: Option<u64>,

    /// Whether an `All` bucket is offered.
    pub all_option: bool,

    /// Query parameter carrying the selected group in navigation links.
    pub group_param: String,
}

impl AlphabarConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_records(mut self, min_records: Option<u64>) -> Self {
        self.min_records = min_records;
        self
    }

    pub fn with_all_option(mut self, all_option: bool) -> Self {
        self.all_option = all_option;
        self
    }

    pub fn with_group_param(mut self, group_param: impl Into<String>) -> Self {
        self.group_param = group_param.into();
        self
    }

    /// Loads defaults from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads defaults through an arbitrary key lookup. Missing or
    /// unparseable values keep the built-in default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_MINIMUM_RECORDS) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                match trimmed.parse() {
                    Ok(min) => config.min_records = Some(min),
                    Err(_) => tracing::warn!(
                        key = ENV_MINIMUM_RECORDS,
                        value = %value,
                        "ignoring unparseable minimum record count"
                    ),
                }
            }
        }

        if let Some(value) = lookup(ENV_ALL_OPTION) {
            config.all_option = parse_bool(&value, config.all_option);
        }

        if let Some(value) = lookup(ENV_GROUP_PARAM) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                config.group_param = trimmed.to_string();
            }
        }

        config
    }
}

impl Default for AlphabarConfig {
    fn default() -> Self {
        Self {
            min_records: None,
            all_option: false,
            group_param: DEFAULT_GROUP_PARAM.to_string(),
        }
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" => true,
        "0" | "false" | "f" | "no" | "n" => false,
        _ => default,
    }
}
