use crate::error::Error;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;

/// Fixed strings of the generator. Every field may be omitted in the YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First line of the generated unit
    pub header: String,
    /// Runtime header providing `MetricBase`, `FEV` and the event helpers
    pub include: String,
    /// Nesting namespaces, outermost first
    pub namespaces: Vec<String>,
    /// Class whose definition ends the metrics and starts the parent links
    pub sentinel: String,
    /// Classes starting with this go to the extra collection
    pub extra_prefix: String,
    /// Helper functions provided by the runtime: name to body line count
    pub skip_functions: IndexMap<String, usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header: "// Automatically generated by ratiogen. Do not edit.".to_string(),
            include: "arch_ratios.h".to_string(),
            namespaces: vec!["mperf".to_string(), "tma".to_string()],
            sentinel: "Setup".to_string(),
            extra_prefix: "Metric".to_string(),
            skip_functions: IndexMap::from([
                ("handle_error".to_string(), 4),
                ("handle_error_metric".to_string(), 3),
            ]),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::FileRead(path.to_string(), e))?;
        serde_yaml::from_reader(BufReader::new(file))
            .map_err(|e| Error::Config(path.to_string(), e))
    }

    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        serde_yaml::from_str(text).map_err(|e| Error::Config("<inline>".to_string(), e))
    }

    pub fn is_extra(&self, class: &str) -> bool {
        !self.extra_prefix.is_empty() && class.starts_with(&self.extra_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("namespaces: [perf, ratios]\nsentinel: Init\n").unwrap();
        assert_eq!(config.namespaces, ["perf", "ratios"]);
        assert_eq!(config.sentinel, "Init");
        assert_eq!(config.include, "arch_ratios.h");
        assert_eq!(config.skip_functions.get("handle_error"), Some(&4));
    }

    #[test]
    fn skip_functions_override() {
        let config = Config::from_yaml("skip_functions:\n  check_ratio: 2\n").unwrap();
        assert_eq!(config.skip_functions.len(), 1);
        assert_eq!(config.skip_functions.get("check_ratio"), Some(&2));
    }

    #[test]
    fn extra_prefix() {
        let config = Config::default();
        assert!(config.is_extra("Metric_IPC"));
        assert!(!config.is_extra("Frontend_Bound"));
    }

    #[test]
    fn bad_yaml() {
        assert!(matches!(
            Config::from_yaml("namespaces: 3"),
            Err(Error::Config(..))
        ));
    }
}
