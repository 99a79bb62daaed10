//! Redistribution Integration Tests
//!
//! Placement, provenance, and ordering of expanded stories.

use cheatsheet::core::{expand, normalize_related};
use cheatsheet::{Placement, RawStory, RawTip, Tip};

fn tip(number: u32, stories: Vec<RawStory>) -> RawTip {
    RawTip {
        number,
        title: format!("Tip {}", number),
        description: format!("Description {}", number),
        stories,
    }
}

fn find(tips: &[Tip], number: u32) -> &Tip {
    tips.iter().find(|t| t.number == number).unwrap()
}

#[test]
fn test_story_with_one_related_tip() {
    let out = expand(&[
        tip(1, vec![RawStory::new("Broke the build", [2])]),
        tip(2, vec![]),
    ]);

    let home = &find(&out, 1).stories;
    assert_eq!(home.len(), 1);
    assert!(home[0].is_home_tip());
    assert_eq!(home[0].source_tip, 1);
    assert_eq!(home[0].related_tips, vec![1, 2]);

    let xref = &find(&out, 2).stories;
    assert_eq!(xref.len(), 1);
    assert!(!xref[0].is_home_tip());
    assert!(xref[0].is_xref());
    assert_eq!(xref[0].content, "Broke the build");
    assert_eq!(xref[0].source_tip, 1);
}

#[test]
fn test_story_without_related_tips() {
    let out = expand(&[
        tip(3, vec![RawStory::new("Solo", [])]),
        tip(4, vec![]),
    ]);

    let stories = &find(&out, 3).stories;
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].related_tips, vec![3]);
    assert!(find(&out, 4).stories.is_empty());
}

#[test]
fn test_self_referential_story() {
    let out = expand(&[
        tip(4, vec![RawStory::new("Already mine", [4, 5])]),
        tip(5, vec![]),
    ]);

    let home = &find(&out, 4).stories;
    assert_eq!(home.len(), 1);
    assert!(home[0].is_home_tip());
    assert_eq!(home[0].related_tips, vec![4, 5]);

    let xref = &find(&out, 5).stories;
    assert_eq!(xref.len(), 1);
    assert_eq!(xref[0].placement, Placement::CrossReference);
}

#[test]
fn test_unknown_related_tip_is_dropped() {
    let out = expand(&[tip(6, vec![RawStory::new("Points nowhere", [99])])]);

    assert_eq!(out.len(), 1);
    let stories = &out[0].stories;
    assert_eq!(stories.len(), 1);
    assert!(stories[0].is_home_tip());
    // Normalization keeps the reference; only placement skips it
    assert_eq!(stories[0].related_tips, vec![6, 99]);
}

#[test]
fn test_mutual_references_stay_distinct() {
    let out = expand(&[
        tip(7, vec![RawStory::new("Seven's story", [8])]),
        tip(8, vec![RawStory::new("Eight's story", [7])]),
    ]);

    for number in [7, 8] {
        let stories = &find(&out, number).stories;
        assert_eq!(stories.len(), 2);
        assert_eq!(stories.iter().filter(|s| s.is_home_tip()).count(), 1);
        assert_eq!(stories.iter().filter(|s| s.is_xref()).count(), 1);
    }

    // Tip 7 is processed first: its home story, then 8's cross-reference
    let seven = &find(&out, 7).stories;
    assert_eq!(seven[0].content, "Seven's story");
    assert_eq!(seven[1].content, "Eight's story");

    // Tip 8 receives 7's cross-reference before its own story
    let eight = &find(&out, 8).stories;
    assert_eq!(eight[0].content, "Seven's story");
    assert!(eight[0].is_xref());
    assert_eq!(eight[1].content, "Eight's story");
    assert!(eight[1].is_home_tip());
}

#[test]
fn test_normalization_is_idempotent() {
    let absent = normalize_related(10, &[11, 12]);
    let present = normalize_related(10, &[10, 11, 12]);
    assert_eq!(absent, present);
    assert_eq!(normalize_related(10, &absent), absent);
}

#[test]
fn test_every_home_copy_lands_on_its_source_only() {
    let input = vec![
        tip(1, vec![RawStory::new("a", [2, 3]), RawStory::new("b", [])]),
        tip(2, vec![RawStory::new("c", [1, 1, 3, 42])]),
        tip(3, vec![]),
    ];
    let out = expand(&input);

    let home_copies: usize = out.iter().map(|t| t.home_stories().count()).sum();
    assert_eq!(home_copies, 3);

    for t in &out {
        for story in t.home_stories() {
            assert_eq!(story.source_tip, t.number);
        }
        for story in t.xref_stories() {
            assert_ne!(story.source_tip, t.number);
        }
    }
}

#[test]
fn test_xref_count_matches_distinct_valid_related_tips() {
    let input = vec![
        tip(1, vec![RawStory::new("a", [2, 2, 3, 1, 77])]),
        tip(2, vec![]),
        tip(3, vec![]),
    ];
    let out = expand(&input);

    let key = out[0].stories[0].key.clone();
    let xrefs = out
        .iter()
        .flat_map(|t| t.xref_stories())
        .filter(|s| s.key == key)
        .count();

    // {2, 3} are valid and distinct; 1 is the source, 77 does not exist
    assert_eq!(xrefs, 2);
}

#[test]
fn test_tip_identity_and_order_preserved() {
    let input = vec![
        tip(9, vec![RawStory::new("x", [2])]),
        tip(2, vec![]),
        tip(5, vec![]),
    ];
    let out = expand(&input);

    let numbers: Vec<u32> = out.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![9, 2, 5]);
    assert_eq!(out[0].title, "Tip 9");
    assert_eq!(out[1].description, "Description 2");
}

#[test]
fn test_expand_is_deterministic() {
    let input = vec![
        tip(1, vec![RawStory::new("a", [3, 2]), RawStory::new("b", [3])]),
        tip(2, vec![RawStory::new("c", [1])]),
        tip(3, vec![RawStory::new("d", [1, 2])]),
    ];

    assert_eq!(expand(&input), expand(&input));
}

#[test]
fn test_stories_from_same_source_keep_order() {
    let out = expand(&[
        tip(1, vec![RawStory::new("first", [2]), RawStory::new("second", [2])]),
        tip(2, vec![]),
    ]);

    let contents: Vec<&str> = find(&out, 2)
        .stories
        .iter()
        .map(|s| s.content.as_str())
        .collect();
    assert_eq!(contents, vec!["first", "second"]);
}

#[test]
fn test_expanded_json_shape() {
    let out = expand(&[
        tip(1, vec![RawStory::new("a", [2])]),
        tip(2, vec![]),
    ]);

    let json = serde_json::to_value(&out).unwrap();
    let home = &json[0]["stories"][0];
    assert_eq!(home["sourceTip"], 1);
    assert_eq!(home["isHomeTip"], true);
    assert_eq!(home["relatedTips"], serde_json::json!([1, 2]));

    let xref = &json[1]["stories"][0];
    assert_eq!(xref["isHomeTip"], false);
    assert_eq!(xref["isXref"], true);
}
