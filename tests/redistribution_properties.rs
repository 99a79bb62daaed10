//! Redistribution Property Tests
//!
//! Placement and normalization invariants over generated tip sets. Related
//! lists draw from a range wider than the tip numbers, so they mix
//! duplicates, self-references and unknown tips.

use std::collections::{BTreeSet, HashMap};

use cheatsheet::core::{expand, expand_with_stats, normalize_related};
use cheatsheet::{RawStory, RawTip, StoryKey};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn raw_story() -> impl Strategy<Value = RawStory> {
    ("[a-z ]{0,12}", prop::collection::vec(0_u32..24, 0..6))
        .prop_map(|(content, related)| RawStory::new(content, related))
}

fn raw_tips() -> impl Strategy<Value = Vec<RawTip>> {
    prop::collection::btree_set(1_u32..16, 0..8)
        .prop_flat_map(|numbers| {
            let len = numbers.len();
            (
                Just(numbers.into_iter().collect::<Vec<u32>>()).prop_shuffle(),
                prop::collection::vec(prop::collection::vec(raw_story(), 0..4), len),
            )
        })
        .prop_map(|(numbers, stories)| {
            numbers
                .into_iter()
                .zip(stories)
                .map(|(number, stories)| RawTip {
                    number,
                    title: format!("Tip {}", number),
                    description: String::new(),
                    stories,
                })
                .collect()
        })
}

/// Distinct existing tips a story should be copied to, besides its home
fn expected_targets(tips: &[RawTip], home: u32, story: &RawStory) -> BTreeSet<u32> {
    let existing: BTreeSet<u32> = tips.iter().map(|t| t.number).collect();
    story
        .related_tips
        .iter()
        .copied()
        .filter(|n| *n != home && existing.contains(n))
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn home_copy_lands_once_on_source_tip(tips in raw_tips()) {
        let out = expand(&tips);

        let mut homes: HashMap<StoryKey, Vec<u32>> = HashMap::new();
        for tip in &out {
            for story in tip.home_stories() {
                prop_assert_eq!(story.source_tip, tip.number);
                homes.entry(story.key.clone()).or_default().push(tip.number);
            }
        }

        let raw_count: usize = tips.iter().map(|t| t.stories.len()).sum();
        prop_assert_eq!(homes.len(), raw_count);
        for tip in &tips {
            for index in 0..tip.stories.len() {
                let key = StoryKey::derive(tip.number, index);
                prop_assert_eq!(homes.get(&key), Some(&vec![tip.number]));
            }
        }
    }

    #[test]
    fn xref_copies_match_distinct_existing_related_tips(tips in raw_tips()) {
        let out = expand(&tips);

        for tip in &tips {
            for (index, story) in tip.stories.iter().enumerate() {
                let key = StoryKey::derive(tip.number, index);
                let key = &key;
                let placed: Vec<u32> = out
                    .iter()
                    .flat_map(|t| t.xref_stories().filter(move |s| &s.key == key).map(move |_| t.number))
                    .collect();
                let expected = expected_targets(&tips, tip.number, story);

                prop_assert_eq!(placed.len(), expected.len());
                prop_assert_eq!(placed.into_iter().collect::<BTreeSet<u32>>(), expected);
            }
        }
    }

    #[test]
    fn normalization_is_idempotent(home in 0_u32..24, related in prop::collection::vec(0_u32..24, 0..10)) {
        let once = normalize_related(home, &related);

        prop_assert_eq!(normalize_related(home, &once), once.clone());
        prop_assert!(once.contains(&home));
        prop_assert_eq!(once.iter().collect::<BTreeSet<_>>().len(), once.len());
        if !related.contains(&home) {
            prop_assert_eq!(once[0], home);
        }
    }

    #[test]
    fn expansion_is_deterministic_and_leaves_input_intact(tips in raw_tips()) {
        let before = tips.clone();

        let (first, first_stats) = expand_with_stats(&tips);
        let (second, second_stats) = expand_with_stats(&tips);

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first_stats, second_stats);
        prop_assert_eq!(&tips, &before);

        let numbers: Vec<u32> = first.iter().map(|t| t.number).collect();
        let input_numbers: Vec<u32> = tips.iter().map(|t| t.number).collect();
        prop_assert_eq!(numbers, input_numbers);
    }
}
