//! Cross-reference resolution.
//!
//! A clicked reference names a target tip and the tip it was clicked on.
//! Resolution picks the story instance on the target that the click means,
//! or falls back to the card itself.

use serde::Serialize;

use crate::domain::{StoryKey, Tip};

/// A clicked tip reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Tip the reference points at
    pub target: u32,

    /// Tip whose card contained the clicked reference
    pub origin: u32,

    /// Key of the story the reference was rendered in, when known
    pub story: Option<StoryKey>,
}

impl Reference {
    pub fn new(target: u32, origin: u32) -> Self {
        Self {
            target,
            origin,
            story: None,
        }
    }

    /// Pin the reference to the story it was rendered in
    pub fn with_story(mut self, key: StoryKey) -> Self {
        self.story = Some(key);
        self
    }
}

/// Outcome of resolving a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A specific story instance on the target tip
    Story { tip: u32, index: usize },

    /// The target tip exists but no story instance matches
    CardOnly { tip: u32 },

    /// No tip with the target number
    TipNotFound { tip: u32 },
}

impl Resolution {
    /// Tip number to scroll to, if any
    pub fn tip(&self) -> Option<u32> {
        match self {
            Resolution::Story { tip, .. } | Resolution::CardOnly { tip } => Some(*tip),
            Resolution::TipNotFound { .. } => None,
        }
    }
}

/// Resolve a reference against the expanded view.
///
/// Order: exact story key, then a story whose source is the origin tip, then
/// a story that lists the origin tip as related. First match wins.
pub fn resolve(tips: &[Tip], reference: &Reference) -> Resolution {
    let Some(target) = tips.iter().find(|t| t.number == reference.target) else {
        return Resolution::TipNotFound {
            tip: reference.target,
        };
    };

    let by_key = reference
        .story
        .as_ref()
        .and_then(|key| target.stories.iter().position(|s| &s.key == key));

    let index = by_key
        .or_else(|| {
            target
                .stories
                .iter()
                .position(|s| s.source_tip == reference.origin)
        })
        .or_else(|| {
            target
                .stories
                .iter()
                .position(|s| s.relates_to(reference.origin))
        });

    match index {
        Some(index) => Resolution::Story {
            tip: target.number,
            index,
        },
        None => Resolution::CardOnly { tip: target.number },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::redistribute::expand;
    use crate::domain::{RawStory, RawTip};

    fn fixture() -> Vec<Tip> {
        expand(&[
            RawTip::new(1, "One", "").with_story(RawStory::new("from one", [2])),
            RawTip::new(2, "Two", "").with_story(RawStory::new("from two", [3])),
            RawTip::new(3, "Three", ""),
            RawTip::new(4, "Four", ""),
        ])
    }

    #[test]
    fn test_missing_target() {
        let tips = fixture();
        assert_eq!(
            resolve(&tips, &Reference::new(42, 1)),
            Resolution::TipNotFound { tip: 42 }
        );
    }

    #[test]
    fn test_source_tip_match() {
        let tips = fixture();
        // Tip 2 holds [xref "from one", home "from two"]
        assert_eq!(
            resolve(&tips, &Reference::new(2, 1)),
            Resolution::Story { tip: 2, index: 0 }
        );
    }

    #[test]
    fn test_related_tip_match() {
        let tips = fixture();
        // Source link on tip 2's copy of "from one" leads back to tip 1's home copy
        assert_eq!(
            resolve(&tips, &Reference::new(1, 2)),
            Resolution::Story { tip: 1, index: 0 }
        );
    }

    #[test]
    fn test_story_key_wins() {
        let tips = fixture();
        let key = tips[1].stories[1].key.clone();
        // Origin 1 would match index 0 by source; the key pins index 1
        assert_eq!(
            resolve(&tips, &Reference::new(2, 1).with_story(key)),
            Resolution::Story { tip: 2, index: 1 }
        );
    }

    #[test]
    fn test_card_only() {
        let tips = fixture();
        assert_eq!(
            resolve(&tips, &Reference::new(4, 1)),
            Resolution::CardOnly { tip: 4 }
        );
        assert_eq!(Resolution::CardOnly { tip: 4 }.tip(), Some(4));
    }
}
