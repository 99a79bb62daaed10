//! Story redistribution.
//!
//! Turns tip-owned stories into the per-tip view: every story lands once on
//! its home tip and once on each existing related tip. The input is never
//! modified; every output record is freshly built.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{Placement, RawTip, Story, StoryKey, Tip};

/// Counters collected during one expansion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionStats {
    /// Tips in the output
    pub tips: usize,

    /// Raw stories processed
    pub stories: usize,

    /// Copies placed on home tips
    pub home_copies: usize,

    /// Copies placed on related tips
    pub xref_copies: usize,

    /// Related-tip references naming a tip that does not exist
    pub dropped_refs: usize,
}

/// Normalize a story's related tips for its home tip.
///
/// Duplicates are removed keeping the first occurrence, and `home` is
/// inserted at the front only when absent.
pub fn normalize_related(home: u32, related: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::with_capacity(related.len() + 1);
    let mut normalized: Vec<u32> = related.iter().copied().filter(|n| seen.insert(*n)).collect();

    if !seen.contains(&home) {
        normalized.insert(0, home);
    }

    normalized
}

/// Build the expanded view from raw tips.
pub fn expand(tips: &[RawTip]) -> Vec<Tip> {
    expand_with_stats(tips).0
}

/// Build the expanded view and report what was placed.
#[instrument(skip(tips), fields(tips = tips.len()))]
pub fn expand_with_stats(tips: &[RawTip]) -> (Vec<Tip>, ExpansionStats) {
    let mut output: Vec<Tip> = tips.iter().map(Tip::from_raw).collect();

    // First tip with a number receives that number's cross-references
    let mut index: HashMap<u32, usize> = HashMap::with_capacity(tips.len());
    for (pos, tip) in tips.iter().enumerate() {
        index.entry(tip.number).or_insert(pos);
    }

    let mut stats = ExpansionStats {
        tips: output.len(),
        ..Default::default()
    };

    for (home_pos, tip) in tips.iter().enumerate() {
        for (story_idx, raw) in tip.stories.iter().enumerate() {
            stats.stories += 1;

            let related_tips = normalize_related(tip.number, &raw.related_tips);
            let key = StoryKey::derive(tip.number, story_idx);

            let placed = |placement| Story {
                content: raw.content.clone(),
                related_tips: related_tips.clone(),
                source_tip: tip.number,
                placement,
                key: key.clone(),
            };

            output[home_pos].stories.push(placed(Placement::Home));
            stats.home_copies += 1;

            for &related in related_tips.iter().filter(|&&n| n != tip.number) {
                match index.get(&related) {
                    Some(&pos) => {
                        output[pos].stories.push(placed(Placement::CrossReference));
                        stats.xref_copies += 1;
                    }
                    None => {
                        debug!(source_tip = tip.number, related, "Skipping reference to unknown tip");
                        stats.dropped_refs += 1;
                    }
                }
            }
        }
    }

    debug!(?stats, "Stories redistributed");
    (output, stats)
}
