//! Story records, raw and expanded.
//!
//! A raw story belongs to the tip whose array contains it. An expanded story
//! is one placed copy of a raw story, tagged with where it came from.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A story as it appears in the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStory {
    /// Display text
    pub content: String,

    /// Tip numbers this story also relates to
    #[serde(default)]
    pub related_tips: Vec<u32>,
}

impl RawStory {
    /// Create a raw story
    pub fn new(content: impl Into<String>, related_tips: impl IntoIterator<Item = u32>) -> Self {
        Self {
            content: content.into(),
            related_tips: related_tips.into_iter().collect(),
        }
    }
}

/// Identifier shared by every placed copy of one raw story (SHA256[0:8] hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryKey(String);

impl StoryKey {
    /// Derive the key for the `index`-th story of tip `source_tip`
    pub fn derive(source_tip: u32, index: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(source_tip.to_be_bytes());
        hasher.update((index as u64).to_be_bytes());
        let digest = hasher.finalize();
        Self(hex::encode(&digest[..8]))
    }

    /// Wrap an existing key string (e.g. from a clicked reference)
    pub fn from_string(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an expanded copy sits relative to its story's home tip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The copy on the tip that owns the story
    Home,

    /// A copy placed on a related tip
    CrossReference,
}

/// One placed copy of a story in the expanded view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "StoryRecord", from = "StoryRecord")]
pub struct Story {
    /// Display text, shared with the raw story
    pub content: String,

    /// Normalized related tips; always starts with `source_tip` unless the
    /// raw list already contained it
    pub related_tips: Vec<u32>,

    /// Number of the tip that originally owned this story
    pub source_tip: u32,

    /// Home copy or cross-reference copy
    pub placement: Placement,

    /// Identifies the originating raw story
    pub key: StoryKey,
}

impl Story {
    pub fn is_home_tip(&self) -> bool {
        self.placement == Placement::Home
    }

    pub fn is_xref(&self) -> bool {
        self.placement == Placement::CrossReference
    }

    /// Whether this story names `tip` among its related tips
    pub fn relates_to(&self, tip: u32) -> bool {
        self.related_tips.contains(&tip)
    }
}

/// Wire shape of an expanded story: `isHomeTip` always, `isXref` only on
/// cross-reference copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryRecord {
    content: String,
    related_tips: Vec<u32>,
    source_tip: u32,
    is_home_tip: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    is_xref: Option<bool>,
    story_key: StoryKey,
}

impl From<Story> for StoryRecord {
    fn from(story: Story) -> Self {
        let is_home_tip = story.is_home_tip();
        Self {
            content: story.content,
            related_tips: story.related_tips,
            source_tip: story.source_tip,
            is_home_tip,
            is_xref: (!is_home_tip).then_some(true),
            story_key: story.key,
        }
    }
}

impl From<StoryRecord> for Story {
    fn from(record: StoryRecord) -> Self {
        let placement = if record.is_home_tip {
            Placement::Home
        } else {
            Placement::CrossReference
        };
        Self {
            content: record.content,
            related_tips: record.related_tips,
            source_tip: record.source_tip,
            placement,
            key: record.story_key,
        }
    }
}
