use anyhow::{bail, Context, Result};
use log::debug;
use std::path::Path;
use std::sync::Arc;

use crate::core::io::Storage;
use crate::core::state::UserProfile;

const PROFILE_KEY: &str = "user_profile";

/// Per-visitor profile records on top of a [`Storage`].
pub struct ProfileStore {
    root: String,
    storage: Arc<dyn Storage>,
}

impl ProfileStore {
    pub fn new(root: &str, storage: Arc<dyn Storage>) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            storage,
        }
    }

    fn path(&self, visitor: &str) -> Result<String> {
        Ok(format!("{}/{}.json", visitor_dir(&self.root, visitor)?, PROFILE_KEY))
    }

    /// Returns the stored profile, or an empty one if the visitor never
    /// saved anything.
    pub async fn load(&self, visitor: &str) -> Result<UserProfile> {
        let path = self.path(visitor)?;
        if !self.storage.exists(&path).await? {
            return Ok(UserProfile::default());
        }
        let bytes = self.storage.read(&path).await?;
        let profile = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse profile {}", path))?;
        Ok(profile)
    }

    /// Replaces the visitor's profile wholesale.
    pub async fn save(&self, visitor: &str, profile: &UserProfile) -> Result<()> {
        let path = self.path(visitor)?;
        let content = serde_json::to_string_pretty(profile)?;
        self.storage.write(&path, content.as_bytes()).await?;
        debug!("Saved profile for {}", visitor);
        Ok(())
    }
}

/// Visitor ids become directory names, so anything that could escape the
/// root is refused.
pub(crate) fn visitor_dir(root: &str, visitor: &str) -> Result<String> {
    let valid = !visitor.is_empty()
        && visitor
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        bail!("Invalid visitor id: {:?}", visitor);
    }
    Ok(Path::new(root).join(visitor).to_string_lossy().to_string())
}
