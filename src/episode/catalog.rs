use super::Episode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read episode catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Episode catalog {} is not valid JSON: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Episode '{0}' has no media url")]
    MissingMedia(String),

    #[error("Episode catalog {} contains no episodes", .0.display())]
    Empty(PathBuf),
}

// Either a bare array or the API envelope `{ "episodes": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCatalog {
    List(Vec<RawEpisode>),
    Wrapped { episodes: Vec<RawEpisode> },
}

#[derive(Deserialize)]
struct RawEpisode {
    id: String,
    title: String,
    #[serde(default)]
    members: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    file: Option<RawMedia>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawMedia {
    url: String,
    #[serde(default)]
    duration: u64,
}

impl TryFrom<RawEpisode> for Episode {
    type Error = CatalogError;

    fn try_from(raw: RawEpisode) -> Result<Self, Self::Error> {
        // Nested `file` wins over flat fields
        let (url, duration) = match raw.file {
            Some(media) => (media.url, media.duration),
            None => match raw.url {
                Some(url) => (url, raw.duration.unwrap_or(0)),
                None => return Err(CatalogError::MissingMedia(raw.id)),
            },
        };

        Ok(Episode {
            id: raw.id,
            title: raw.title,
            members: raw.members,
            thumbnail: raw.thumbnail,
            url,
            duration,
            published_at: raw.published_at,
            description: raw.description,
        })
    }
}

/// Parse a catalog from JSON text. Newest episodes come first.
pub fn parse_catalog(json: &str, origin: &Path) -> Result<Vec<Episode>, CatalogError> {
    let raw: RawCatalog = serde_json::from_str(json).map_err(|source| CatalogError::Json {
        path: origin.to_path_buf(),
        source,
    })?;

    let raw_episodes = match raw {
        RawCatalog::List(list) => list,
        RawCatalog::Wrapped { episodes } => episodes,
    };

    let mut episodes = raw_episodes
        .into_iter()
        .map(Episode::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if episodes.is_empty() {
        return Err(CatalogError::Empty(origin.to_path_buf()));
    }

    // Undated episodes sink to the bottom, stable otherwise
    episodes.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    debug!("Parsed {} episodes from {}", episodes.len(), origin.display());
    Ok(episodes)
}

pub fn load_catalog(path: &Path) -> Result<Vec<Episode>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let episodes = parse_catalog(&content, path)?;
    info!("Loaded {} episodes from {}", episodes.len(), path.display());
    Ok(episodes)
}
