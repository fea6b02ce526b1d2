// Episodes - the things we actually play
// Loaded once from the catalog, never mutated afterwards

pub mod catalog;

pub use catalog::{load_catalog, CatalogError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub members: String, // display string of everyone on the show
    pub thumbnail: String,
    pub url: String,
    pub duration: u64, // seconds
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Episode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>, duration: u64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            members: String::new(),
            thumbnail: String::new(),
            url: url.into(),
            duration,
            published_at: None,
            description: None,
        }
    }

    pub fn with_members(mut self, members: impl Into<String>) -> Self {
        self.members = members.into();
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    pub fn display_members(&self) -> &str {
        if self.members.is_empty() {
            "Unknown hosts"
        } else {
            &self.members
        }
    }

    /// Publish date and blurb for the details pane.
    pub fn details(&self) -> String {
        let date = self.published_at.map(|at| at.format("%d %b %Y").to_string());
        match (date, self.description.as_deref()) {
            (Some(date), Some(text)) => format!("{} · {}", date, text),
            (Some(date), None) => date,
            (None, Some(text)) => text.to_string(),
            (None, None) => String::from("No description"),
        }
    }

    /// Clamp a position to this episode's length.
    pub fn clamp_position(&self, seconds: u64) -> u64 {
        seconds.min(self.duration)
    }
}
