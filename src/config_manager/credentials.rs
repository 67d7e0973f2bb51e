use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
const CLOUDSDK_CONFIG_ENV: &str = "CLOUDSDK_CONFIG";
const WELL_KNOWN_FILE: &str = "application_default_credentials.json";

/// Subset of an application-default credentials file
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    quota_project_id: Option<String>,
}

/// Resolve a project id from ambient application-default credentials.
///
/// Looks at `GOOGLE_APPLICATION_CREDENTIALS` first, then the gcloud
/// well-known file. Any failure is swallowed and yields `None`.
pub fn discover_project_id(vars: &HashMap<String, String>) -> Option<String> {
    find_project_id(candidate_paths(vars, default_gcloud_dir()))
}

fn find_project_id(paths: Vec<PathBuf>) -> Option<String> {
    paths.into_iter().find_map(|path| match read_project_id(&path) {
        Ok(found) => found,
        Err(e) => {
            debug!("Skipping credentials at {}: {}", path.display(), e);
            None
        }
    })
}

/// gcloud keeps its configuration in `~/.config/gcloud` on unix-likes
/// (macOS included) and `%APPDATA%\gcloud` on Windows.
fn default_gcloud_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::config_dir().map(|dir| dir.join("gcloud"))
    } else {
        dirs::home_dir().map(|home| home.join(".config").join("gcloud"))
    }
}

fn candidate_paths(vars: &HashMap<String, String>, default_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(explicit) = vars.get(CREDENTIALS_ENV).filter(|p| !p.is_empty()) {
        paths.push(PathBuf::from(explicit));
    }
    let gcloud_dir = vars
        .get(CLOUDSDK_CONFIG_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or(default_dir);
    if let Some(dir) = gcloud_dir {
        paths.push(dir.join(WELL_KNOWN_FILE));
    }
    paths
}

fn read_project_id(path: &Path) -> anyhow::Result<Option<String>> {
    let content = fs::read_to_string(path)?;
    let creds: CredentialsFile = serde_json::from_str(&content)?;
    Ok(creds
        .project_id
        .or(creds.quota_project_id)
        .filter(|id| !id.is_empty()))
}
