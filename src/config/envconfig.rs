use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Config assembled from an optional `.env` file and `APP_<SECTION>__<KEY>`
/// environment variables. Variables already set in the process win over the
/// file.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    /// Candidate `.env` files, first match wins.
    fn dotenv_candidates() -> Vec<PathBuf> {
        vec![
            Path::new(env!("CARGO_MANIFEST_DIR")).join(".env"),
            PathBuf::from(".env"),
        ]
    }

    /// Loads the first `.env` that exists. A file that exists but cannot be
    /// read or parsed is an error.
    fn load_dotenv() -> Result<Option<PathBuf>> {
        for path in Self::dotenv_candidates() {
            if load_dotenv_file(&path)? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn environment() -> config_rs::Environment {
        config_rs::Environment::with_prefix(Self::PREFIX)
            .prefix_separator("_")
            .separator(Self::SEPARATOR)
            .try_parsing(true)
    }

    fn from_env() -> Result<Self> {
        if let Some(path) = Self::load_dotenv()? {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let cfg = config_rs::Config::builder()
            .add_source(Self::environment())
            .build()
            .context("failed to read environment variables for config")?
            .try_deserialize::<Self>()
            .context("failed to deserialize environment into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}

/// `Ok(false)` when `path` does not exist.
pub fn load_dotenv_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(err)) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => {
            Err(anyhow::Error::new(err).context(format!("failed to load {}", path.display())))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::load_dotenv_file;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tasklist-envconfig-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        let path = dir.join(name);
        fs::write(&path, contents).expect("write scratch file");
        path
    }

    #[test]
    fn missing_file_is_skipped() {
        let path = std::env::temp_dir().join("tasklist-envconfig-does-not-exist.env");
        assert!(!load_dotenv_file(&path).expect("missing file is not an error"));
    }

    #[test]
    fn malformed_file_is_reported() {
        let path = scratch_file("malformed.env", "TASKLIST_ENVCONFIG_BROKEN='unterminated\n");

        let err = load_dotenv_file(&path).expect_err("malformed file should fail");
        assert!(err.to_string().contains("malformed.env"));
        assert!(std::env::var("TASKLIST_ENVCONFIG_BROKEN").is_err());
    }

    #[test]
    fn well_formed_file_is_loaded() {
        let path = scratch_file("valid.env", "TASKLIST_ENVCONFIG_LOADED=yes\n");

        assert!(load_dotenv_file(&path).expect("valid file"));
        assert_eq!(
            std::env::var("TASKLIST_ENVCONFIG_LOADED").as_deref(),
            Ok("yes")
        );
    }
}
