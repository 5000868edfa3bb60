use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::core::io::Storage;
use crate::core::model::Category;
use crate::core::state::SavedPiece;
use crate::services::profile::visitor_dir;

/// Generated pieces a visitor chose to keep, one list per category.
pub struct Library {
    root: String,
    storage: Arc<dyn Storage>,
}

impl Library {
    pub fn new(root: &str, storage: Arc<dyn Storage>) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            storage,
        }
    }

    fn path(&self, visitor: &str, category: Category) -> Result<String> {
        Ok(format!(
            "{}/library/{}.json",
            visitor_dir(&self.root, visitor)?,
            category.response_type()
        ))
    }

    pub async fn list(&self, visitor: &str, category: Category) -> Result<Vec<SavedPiece>> {
        let path = self.path(visitor, category)?;
        if !self.storage.exists(&path).await? {
            return Ok(Vec::new());
        }
        let bytes = self.storage.read(&path).await?;
        serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse library {}", path))
    }

    pub async fn save(
        &self,
        visitor: &str,
        category: Category,
        content: &str,
        now: DateTime<Local>,
    ) -> Result<SavedPiece> {
        let path = self.path(visitor, category)?;
        let mut pieces = self.list(visitor, category).await?;

        // Ids are millisecond timestamps, bumped when two saves collide.
        let last_id = pieces.iter().map(|p| p.id).max().unwrap_or(i64::MIN);
        let piece = SavedPiece {
            id: now.timestamp_millis().max(last_id.saturating_add(1)),
            category: category.response_type().to_string(),
            content: content.to_string(),
            timestamp: now.to_rfc3339(),
        };
        pieces.push(piece.clone());

        let content = serde_json::to_string_pretty(&pieces)?;
        self.storage.write(&path, content.as_bytes()).await?;
        Ok(piece)
    }

    /// Returns whether a piece with that id existed.
    pub async fn remove(&self, visitor: &str, category: Category, id: i64) -> Result<bool> {
        let path = self.path(visitor, category)?;
        let mut pieces = self.list(visitor, category).await?;
        let before = pieces.len();
        pieces.retain(|p| p.id != id);
        if pieces.len() == before {
            return Ok(false);
        }
        let content = serde_json::to_string_pretty(&pieces)?;
        self.storage.write(&path, content.as_bytes()).await?;
        Ok(true)
    }

    /// Drops every saved piece in one category.
    pub async fn clear(&self, visitor: &str, category: Category) -> Result<()> {
        let path = self.path(visitor, category)?;
        self.storage.delete(&path).await
    }
}
