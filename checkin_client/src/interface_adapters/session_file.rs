use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{Session, SessionStore};

// On-disk layout of the named store. Missing keys read as empty strings.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredPrefs {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    username: String,
}

/// Session store backed by a small TOML file, `<dir>/<store_name>.toml`.
///
/// One file holds the single session of this installation; logout deletes it.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>, store_name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{store_name}.toml")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, String> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("read {}: {err}", self.path.display())),
        };

        let prefs: StoredPrefs =
            toml::from_str(&raw).map_err(|err| format!("parse {}: {err}", self.path.display()))?;

        Ok(Some(Session {
            api_key: prefs.api_key,
            username: prefs.username,
        }))
    }

    async fn save(&self, session: &Session) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| format!("create {}: {err}", parent.display()))?;
        }

        let prefs = StoredPrefs {
            api_key: session.api_key.clone(),
            username: session.username.clone(),
        };
        let raw = toml::to_string(&prefs).map_err(|err| err.to_string())?;

        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|err| format!("write {}: {err}", self.path.display()))
    }

    async fn clear(&self) -> Result<bool, String> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(format!("remove {}: {err}", self.path.display())),
        }
    }
}
