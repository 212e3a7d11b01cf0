// src/config.rs
use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

const CONFIG_FILE: &str = "endpoints.json";
const PRIMARY_ENV: &str = "INSIGHT_PRIMARY_URL";
const RERUN_ENV: &str = "INSIGHT_RERUN_URL";

const DEFAULT_PRIMARY: &str = "https://retentiontoolbackend.vercel.app";
const DEFAULT_RERUN: &str = "https://socialenrichmentbackend.vercel.app";

/// Base URLs of the two enrichment services. Endpoint A receives the primary
/// upload, endpoint B the re-run of the last uploaded file.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub primary: String,
    pub rerun: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EndpointsFile {
    primary: Option<String>,
    rerun: Option<String>,
}

impl Endpoints {
    /// Resolves the endpoint configuration: environment variables override
    /// an optional `endpoints.json` in the working directory, which in turn
    /// overrides the built-in defaults.
    pub fn resolve() -> Self {
        Self::from_sources(
            env::var(PRIMARY_ENV).ok(),
            env::var(RERUN_ENV).ok(),
            read_config_file(Path::new(CONFIG_FILE)),
        )
    }

    fn from_sources(
        primary_env: Option<String>,
        rerun_env: Option<String>,
        file: EndpointsFile,
    ) -> Self {
        Self::from_parts(primary_env.or(file.primary), rerun_env.or(file.rerun))
    }

    fn from_parts(primary: Option<String>, rerun: Option<String>) -> Self {
        Endpoints {
            primary: primary.unwrap_or_else(|| DEFAULT_PRIMARY.to_string()),
            rerun: rerun.unwrap_or_else(|| DEFAULT_RERUN.to_string()),
        }
    }

    pub fn primary_enrich_url(&self) -> String {
        enrich_url(&self.primary)
    }

    pub fn rerun_enrich_url(&self) -> String {
        enrich_url(&self.rerun)
    }
}

fn enrich_url(base: &str) -> String {
    format!("{}/api/enrich", base.trim_end_matches('/'))
}

fn read_config_file(path: &Path) -> EndpointsFile {
    let Ok(contents) = fs::read_to_string(path) else {
        return EndpointsFile::default();
    };
    match serde_json::from_str(&contents) {
        Ok(file) => file,
        Err(err) => {
            warn!("ignoring malformed {}: {}", path.display(), err);
            EndpointsFile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let endpoints = Endpoints::from_parts(None, None);
        assert_eq!(
            endpoints.primary_enrich_url(),
            "https://retentiontoolbackend.vercel.app/api/enrich"
        );
        assert_eq!(
            endpoints.rerun_enrich_url(),
            "https://socialenrichmentbackend.vercel.app/api/enrich"
        );
    }

    #[test]
    fn overrides_replace_defaults_independently() {
        let endpoints = Endpoints::from_parts(Some("http://localhost:9000".to_string()), None);
        assert_eq!(
            endpoints.primary_enrich_url(),
            "http://localhost:9000/api/enrich"
        );
        assert_eq!(
            endpoints.rerun_enrich_url(),
            "https://socialenrichmentbackend.vercel.app/api/enrich"
        );
    }

    #[test]
    fn trailing_slash_does_not_double_the_path() {
        let endpoints = Endpoints::from_parts(Some("http://localhost:9000/".to_string()), None);
        assert_eq!(
            endpoints.primary_enrich_url(),
            "http://localhost:9000/api/enrich"
        );
    }

    #[test]
    fn environment_overrides_the_config_file() {
        let file = EndpointsFile {
            primary: Some("http://file-primary".to_string()),
            rerun: Some("http://file-rerun".to_string()),
        };

        let endpoints =
            Endpoints::from_sources(Some("http://env-primary".to_string()), None, file);
        assert_eq!(endpoints.primary, "http://env-primary");
        assert_eq!(endpoints.rerun, "http://file-rerun");
    }

    #[test]
    fn resolve_reads_the_environment() {
        // The only test touching these process-wide variables.
        env::set_var(PRIMARY_ENV, "http://env-primary");
        env::set_var(RERUN_ENV, "http://env-rerun");
        let endpoints = Endpoints::resolve();
        env::remove_var(PRIMARY_ENV);
        env::remove_var(RERUN_ENV);

        assert_eq!(endpoints.primary, "http://env-primary");
        assert_eq!(endpoints.rerun, "http://env-rerun");
    }

    #[test]
    fn config_file_fills_missing_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rerun": "http://localhost:9001"}}"#).unwrap();

        let parsed = read_config_file(file.path());
        assert_eq!(parsed.primary, None);
        assert_eq!(parsed.rerun.as_deref(), Some("http://localhost:9001"));
    }

    #[test]
    fn malformed_config_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let parsed = read_config_file(file.path());
        assert!(parsed.primary.is_none() && parsed.rerun.is_none());
    }
}
