use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::ConfigError;

/// Read a configuration file with `${VAR_NAME}` environment substitution.
///
/// Unresolved variables are left in place verbatim; `RunConfig::validate`
/// rejects a host that still contains one.
pub fn read_config_text(config_path: &str) -> Result<String, ConfigError> {
    if !Path::new(config_path).exists() {
        return Err(ConfigError::NotFound(config_path.to_string()));
    }

    let mut buffer = fs::read(config_path).map_err(|source| ConfigError::Io {
        path: config_path.to_string(),
        source,
    })?;

    // Remove BOM if present
    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        buffer.drain(0..3);
    }
    let content = String::from_utf8_lossy(&buffer);

    substitute_env_vars(&content, |name| std::env::var(name).ok())
}

/// Replace `${VAR_NAME}` occurrences using `lookup`
pub fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = Regex::new(r"\$\{(\w+)\}").map_err(|e| ConfigError::Invalid {
        field: "substitution pattern",
        reason: e.to_string(),
    })?;

    let replaced = pattern.replace_all(content, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    Ok(replaced.into_owned())
}

/// Parse a dotenv file into a map without touching the process environment.
/// A missing or unreadable file yields an empty map.
pub fn read_dotenv(path: &Path) -> HashMap<String, String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            debug!("No dotenv file loaded from {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    let mut vars = HashMap::new();
    for item in iter {
        match item {
            Ok((key, value)) => {
                vars.insert(key, value);
            }
            Err(e) => debug!("Skipping malformed dotenv line in {}: {}", path.display(), e),
        }
    }
    vars
}
