// Environment variable loading

use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::env;

/// Default environment prefix
pub const DEFAULT_PREFIX: &str = "MINCER";

/// Environment variable loader
///
/// Keys are returned lower-cased with the prefix and its separator
/// stripped, so `MINCER_HTML_REMOVE_QUOTES` becomes `html_remove_quotes`.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load all matching variables from the process environment
    pub fn load(&self) -> Result<HashMap<String, String>> {
        Ok(self.filter(env::vars()))
    }

    /// Keep the variables under this loader's prefix
    pub fn filter<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = HashMap::new();

        for (key, value) in vars {
            match &self.prefix {
                Some(prefix) => {
                    if let Some(rest) = key.strip_prefix(prefix.as_str())
                        && let Some(trimmed) = rest.strip_prefix('_')
                        && !trimmed.is_empty()
                    {
                        config.insert(trimmed.to_lowercase(), value);
                    }
                }
                None => {
                    config.insert(key.to_lowercase(), value);
                }
            }
        }

        config
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(DEFAULT_PREFIX.to_string()))
    }
}

/// Turn an environment string into a typed value.
///
/// Boolean words become booleans and JSON arrays are parsed; anything else
/// stays a string.
pub fn coerce(value: &str) -> Value {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => return Value::Bool(true),
        "0" | "false" | "no" | "off" => return Value::Bool(false),
        _ => {}
    }

    if trimmed.starts_with('[')
        && let Ok(array @ Value::Array(_)) = serde_json::from_str::<Value>(trimmed)
    {
        return array;
    }

    Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_filter_by_prefix() {
        let loader = EnvLoader::default();
        let found = loader.filter(vars(&[
            ("MINCER_HTML_REMOVE_QUOTES", "true"),
            ("MINCERX_HTML_ENABLED", "false"),
            ("MINCER_", "x"),
            ("PATH", "/bin"),
        ]));

        assert_eq!(found.len(), 1);
        assert_eq!(found["html_remove_quotes"], "true");
    }

    #[test]
    fn test_filter_without_prefix() {
        let loader = EnvLoader::new(None);
        let found = loader.filter(vars(&[("Some_Key", "v")]));
        assert_eq!(found["some_key"], "v");
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce("TRUE"), Value::Bool(true));
        assert_eq!(coerce(" on "), Value::Bool(true));
        assert_eq!(coerce("0"), Value::Bool(false));
        assert_eq!(coerce("No"), Value::Bool(false));
        assert_eq!(coerce("max"), Value::String("max".into()));
        assert_eq!(coerce(r#"["a", "b"]"#), serde_json::json!(["a", "b"]));
        assert_eq!(coerce("[not json"), Value::String("[not json".into()));
    }
}
