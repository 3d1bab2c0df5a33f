//! Reading [`ReplicationConfig`] from TOML.

use std::path::{Path, PathBuf};

use cms_pricingengines::ReplicationConfig;
use thiserror::Error;
use tracing::debug;

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has fields of the wrong type.
    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The settings parsed but are out of range.
    #[error(transparent)]
    Invalid(#[from] cms_core::Error),
}

/// Parse and validate a TOML document. Missing keys take their defaults.
pub fn parse_config(text: &str) -> Result<ReplicationConfig, ConfigError> {
    parse(text, Path::new("<inline>"))
}

/// Load the configuration at `path`, or the defaults when there is none.
pub fn load_config(path: Option<&Path>) -> Result<ReplicationConfig, ConfigError> {
    let Some(path) = path else {
        debug!("no config file given, using defaults");
        return Ok(ReplicationConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&text, path)?;
    debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn parse(text: &str, path: &Path) -> Result<ReplicationConfig, ConfigError> {
    let config: ReplicationConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_pricingengines::ErrorPolicy;

    #[test]
    fn defaults_without_a_file() {
        assert_eq!(load_config(None).unwrap(), ReplicationConfig::default());
    }

    #[test]
    fn inline_document() {
        let c = parse_config("beta = 0.7\n[integration]\nerror_policy = \"warn\"\n").unwrap();
        assert_eq!(c.beta, 0.7);
        assert_eq!(c.integration.error_policy, ErrorPolicy::Warn);
    }

    #[test]
    fn type_errors_and_range_errors_differ() {
        assert!(matches!(
            parse_config("beta = \"high\""),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            parse_config("upper_bound = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            parse_config("[integration]\nerror_policy = \"ignore\""),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/cmsrep.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
