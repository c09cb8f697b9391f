use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub clustering: ClusteringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// AAI threshold for assigning a genome to a representative
    pub aai_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clustering: ClusteringConfig {
                aai_threshold: 0.97,
            },
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::MoiraError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::MoiraError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_threshold() {
        let config = default_config();
        assert_eq!(config.clustering.aai_threshold, 0.97);
    }

    #[test]
    fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[clustering]\naai_threshold = 0.95").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.clustering.aai_threshold, 0.95);
    }

    #[test]
    fn test_malformed_config_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml at all [").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
