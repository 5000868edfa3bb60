use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub preferred_genres: Vec<String>,
    pub writing_style: String,
    pub voice_description: String,
    pub favorite_authors: String,
    pub themes: String,
}

impl UserProfile {
    /// Drops blank and repeated genres, keeping first-seen order.
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.preferred_genres.len());
        for genre in self.preferred_genres.drain(..) {
            let genre = genre.trim().to_string();
            if !genre.is_empty() && !seen.contains(&genre) {
                seen.push(genre);
            }
        }
        self.preferred_genres = seen;
        self
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SavedPiece {
    pub id: i64,
    pub category: String,
    pub content: String,
    pub timestamp: String,
}
