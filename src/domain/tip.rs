//! Tip records.

use serde::{Deserialize, Serialize};

use super::story::{RawStory, Story};

/// A tip as supplied by the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTip {
    /// Unique positive tip number
    pub number: u32,

    pub title: String,

    pub description: String,

    /// Stories owned by this tip
    #[serde(default)]
    pub stories: Vec<RawStory>,
}

impl RawTip {
    /// Create a tip without stories
    pub fn new(number: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            description: description.into(),
            stories: Vec::new(),
        }
    }

    /// Add a story
    pub fn with_story(mut self, story: RawStory) -> Self {
        self.stories.push(story);
        self
    }
}

/// A tip in the expanded view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    pub number: u32,

    pub title: String,

    pub description: String,

    /// Home copies and cross-reference copies, in placement order
    pub stories: Vec<Story>,
}

impl Tip {
    /// Start an expanded tip with the raw tip's identity and no stories
    pub fn from_raw(raw: &RawTip) -> Self {
        Self {
            number: raw.number,
            title: raw.title.clone(),
            description: raw.description.clone(),
            stories: Vec::new(),
        }
    }

    pub fn has_stories(&self) -> bool {
        !self.stories.is_empty()
    }

    /// Label for the expand control
    pub fn expand_label(&self) -> String {
        match self.stories.len() {
            0 => "No stories yet".to_string(),
            1 => "View Story".to_string(),
            n => format!("View {} Stories", n),
        }
    }

    pub fn home_stories(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter().filter(|s| s.is_home_tip())
    }

    pub fn xref_stories(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter().filter(|s| s.is_xref())
    }
}
