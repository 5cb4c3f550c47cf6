// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual mutation tests: every operation must keep membership disjoint
//! and prune empty non-custom groups, while custom groups survive empty.

mod common;

use common::{group, state_of, tab};

const NOW: i64 = 1_700_000_000_000;

#[test]
fn test_add_tab_schemes_url_and_leaves_groups_alone() {
    let mut state = state_of(vec![], vec![group("g1", "Work", vec![], true)]);

    let added = state
        .add_tab("Example", "example.com/path", None, NOW)
        .expect("valid URL");

    assert_eq!(added.url, "https://example.com/path");
    assert_eq!(state.tabs.len(), 1);
    assert!(state.groups[0].tabs.is_empty());
    assert_eq!(added.is_placeholder, None);
}

#[test]
fn test_add_tab_rejects_unparsable_url() {
    let mut state = state_of(vec![], vec![]);
    let result = state.add_tab("Bad", "not a url", None, NOW);
    assert!(result.is_err());
    assert!(state.tabs.is_empty(), "rejected tab must not be created");
}

#[test]
fn test_import_skips_bad_entries_item_level() {
    let mut state = state_of(vec![], vec![]);
    let entries = vec![
        ("Ok".to_string(), "ok.com".to_string()),
        ("Bad".to_string(), "not a url".to_string()),
        ("Also ok".to_string(), "https://fine.dev".to_string()),
    ];

    let outcome = state.import_tabs(&entries, NOW);

    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.skipped, 1);
    assert!(state.tabs.iter().all(|t| t.is_placeholder == Some(true)));
}

#[test]
fn test_ungrouped_tabs_is_derived() {
    let a = tab("a", "https://a.com");
    let b = tab("b", "https://b.com");
    let state = state_of(
        vec![a.clone(), b.clone()],
        vec![group("g1", "Work", vec![a.clone()], true)],
    );

    let ungrouped: Vec<&str> = state.ungrouped_tabs().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ungrouped, vec!["b"]);
}

#[test]
fn test_remove_tab_strips_membership_and_prunes() {
    let a = tab("a", "https://a.com");
    let mut state = state_of(
        vec![a.clone()],
        vec![group("g1", "AI group", vec![a.clone()], false)],
    );

    state.remove_tab("a").unwrap();

    assert!(state.tabs.is_empty());
    assert!(state.groups.is_empty(), "empty non-custom group is pruned");
}

#[test]
fn test_custom_group_survives_empty_after_tab_removal() {
    let a = tab("a", "https://a.com");
    let mut state = state_of(
        vec![a.clone()],
        vec![group("g1", "Mine", vec![a.clone()], true)],
    );

    state.remove_tab_from_group("g1", "a").unwrap();

    assert_eq!(state.groups.len(), 1);
    assert!(state.groups[0].tabs.is_empty());
}

#[test]
fn test_remove_tab_from_group_prunes_non_custom() {
    let a = tab("a", "https://a.com");
    let mut state = state_of(
        vec![a.clone()],
        vec![group("g1", "AI group", vec![a.clone()], false)],
    );

    state.remove_tab_from_group("g1", "a").unwrap();

    assert!(state.groups.is_empty());
    assert_eq!(state.tabs.len(), 1, "the tab itself stays tracked");
}

#[test]
fn test_delete_ai_groups_keeps_custom() {
    let a = tab("a", "https://a.com");
    let mut state = state_of(
        vec![a.clone()],
        vec![
            group("g1", "AI", vec![a.clone()], false),
            group("g2", "Mine", vec![], true),
        ],
    );

    let removed = state.delete_ai_groups();

    assert_eq!(removed, 1);
    assert_eq!(state.groups.len(), 1);
    assert_eq!(state.groups[0].name, "Mine");
}

#[test]
fn test_rename_claims_group_as_custom() {
    let mut state = state_of(vec![], vec![group("g1", "AI name", vec![], false)]);
    // A non-custom group with no tabs would normally be pruned; keep a
    // member so the rename path is what we exercise.
    let a = tab("a", "https://a.com");
    state.tabs.push(a.clone());
    state.groups[0].tabs.push(a);

    state.rename_group("g1", "My name").unwrap();

    assert_eq!(state.groups[0].name, "My name");
    assert!(state.groups[0].is_custom);

    // Renamed groups are exempt from AI bulk deletion.
    let removed = state.delete_ai_groups();
    assert_eq!(removed, 0);
    assert_eq!(state.groups.len(), 1);
}

#[test]
fn test_move_tab_between_groups_guards_duplicates() {
    let a = tab("a", "https://a.com");
    let mut state = state_of(
        vec![a.clone()],
        vec![
            group("g1", "From", vec![a.clone()], true),
            group("g2", "To", vec![a.clone()], true),
        ],
    );

    // Target already holds the tab; the move only removes from source.
    state.move_tab("a", Some("g1"), Some("g2")).unwrap();

    assert!(state.groups[0].tabs.is_empty());
    assert_eq!(state.groups[1].tabs.len(), 1);
}

#[test]
fn test_move_tab_same_group_is_noop() {
    let a = tab("a", "https://a.com");
    let mut state = state_of(
        vec![a.clone()],
        vec![group("g1", "Here", vec![a.clone()], false)],
    );

    state.move_tab("a", Some("g1"), Some("g1")).unwrap();

    assert_eq!(state.groups.len(), 1);
    assert_eq!(state.groups[0].tabs.len(), 1);
}

#[test]
fn test_move_tab_to_ungrouped_prunes_empty_ai_group() {
    let a = tab("a", "https://a.com");
    let mut state = state_of(
        vec![a.clone()],
        vec![group("g1", "AI group", vec![a.clone()], false)],
    );

    state.move_tab("a", Some("g1"), None).unwrap();

    assert!(state.groups.is_empty());
    assert_eq!(state.ungrouped_tabs().len(), 1);
}

#[test]
fn test_move_unknown_tab_errors_without_changes() {
    let mut state = state_of(vec![], vec![group("g1", "Here", vec![], true)]);
    assert!(state.move_tab("ghost", None, Some("g1")).is_err());
    assert!(state.groups[0].tabs.is_empty());
}

#[test]
fn test_remove_tabs_by_url_prunes_groups() {
    let a = tab("a", "https://a.com");
    let b = tab("b", "https://b.com");
    let mut state = state_of(
        vec![a.clone(), b.clone()],
        vec![
            group("g1", "AI group", vec![a.clone()], false),
            group("g2", "Mine", vec![b.clone()], true),
        ],
    );

    let removed = state.remove_tabs_by_url(&[
        "https://a.com".to_string(),
        "https://b.com".to_string(),
    ]);

    assert_eq!(removed, 2);
    assert!(state.tabs.is_empty());
    let names: Vec<&str> = state.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Mine"], "custom survives, AI group pruned");
}

#[test]
fn test_commit_reconciliation_merges_tabs_by_id() {
    let a = tab("a", "https://a.com");
    let placeholder = tab("p", "https://p.com");
    let mut state = state_of(vec![a.clone()], vec![]);

    let new_groups = vec![group("g1", "Fresh", vec![placeholder.clone()], false)];
    state.commit_reconciliation(new_groups.clone(), vec![placeholder.clone(), a.clone()]);

    assert_eq!(state.tabs.len(), 2, "existing id is not duplicated");
    assert_eq!(state.groups, new_groups);
}

#[test]
fn test_export_artifact_shape_and_name() {
    let a = tab("a", "https://a.com");
    let g = group("g1", "My Links", vec![a], true);

    let export = g.export();
    assert_eq!(export.name, "My Links");
    assert_eq!(export.tabs.len(), 1);
    assert_eq!(export.tabs[0].url, "https://a.com");

    assert_eq!(g.export_file_name(), "my_links_tabs.json");

    let json = serde_json::to_value(&export).unwrap();
    assert!(json.get("name").is_some());
    assert!(json["tabs"][0].get("title").is_some());
    assert!(json["tabs"][0].get("url").is_some());
}
