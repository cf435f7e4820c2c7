//! Selection and search over an indexed forest.

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{FakeClient, object_xml};
use orgindex::tree::selection::checked_ids;
use orgindex::tree::{PARTIAL_CLASS, find_node, prepare_view};
use orgindex::{Forest, Indexer, SelectionState, Settings, TypeCatalog};
use tempfile::TempDir;

async fn indexed_forest(temp_dir: &TempDir) -> Forest {
    let client = Arc::new(
        FakeClient::new()
            .listing("ApexClass", &["AccountService", "Billing"])
            .listing("CustomObject", &["Account", "Lead"])
            .file("objects/Account.object", &object_xml(&["Region__c", "Tier__c"]))
            .file("objects/Lead.object", &object_xml(&["Source__c"])),
    );
    let mut settings = Settings::default();
    settings.indexing.temp_root = Some(temp_dir.path().to_path_buf());
    settings.indexing.retain_retrieved = false;

    let catalog = TypeCatalog::new(client.descriptors.clone());
    Indexer::new(client, catalog, Arc::new(settings))
        .index(&["ApexClass", "CustomObject"])
        .await
        .unwrap()
}

fn ids(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_selection_cascades_and_rolls_up() {
    let temp_dir = TempDir::new().unwrap();
    let mut forest = indexed_forest(&temp_dir).await;

    prepare_view(
        &mut forest,
        &ids(&["CustomObject.Account.fields", "ApexClass.Billing"]),
        None,
    );

    // Checked branch implies checked leaves
    let region = find_node(&forest, "CustomObject.Account.fields.Region__c").unwrap();
    assert!(region.checked);

    // Only child tag of Account is checked, so Account is completed
    let account = find_node(&forest, "CustomObject.Account").unwrap();
    assert!(account.checked);
    assert_eq!(account.selection, SelectionState::FullyChecked);

    let object = find_node(&forest, "CustomObject").unwrap();
    assert_eq!(object.selection, SelectionState::PartiallyChecked);
    assert_eq!(object.cls.as_deref(), Some(PARTIAL_CLASS));

    let apex = find_node(&forest, "ApexClass").unwrap();
    assert_eq!(apex.selection, SelectionState::PartiallyChecked);
    assert!(!apex.checked);

    let lead = find_node(&forest, "CustomObject.Lead").unwrap();
    assert_eq!(lead.selection, SelectionState::Unchecked);

    let checked = checked_ids(&forest);
    assert!(checked.contains(&"ApexClass.Billing".to_string()));
    assert!(checked.contains(&"CustomObject.Account.fields.Tier__c".to_string()));
    assert!(!checked.contains(&"CustomObject".to_string()));
}

#[tokio::test]
async fn test_search_reveals_deep_matches() {
    let temp_dir = TempDir::new().unwrap();
    let mut forest = indexed_forest(&temp_dir).await;

    prepare_view(&mut forest, &HashSet::new(), Some("TIER"));

    for id in [
        "CustomObject",
        "CustomObject.Account",
        "CustomObject.Account.fields",
        "CustomObject.Account.fields.Tier__c",
    ] {
        let node = find_node(&forest, id).unwrap();
        assert_eq!(node.visibility, Some(1), "{id}");
    }
    assert!(find_node(&forest, "CustomObject.Account").unwrap().expanded);

    for id in [
        "ApexClass",
        "CustomObject.Lead",
        "CustomObject.Account.fields.Region__c",
    ] {
        let node = find_node(&forest, id).unwrap();
        assert!(node.is_hidden(), "{id}");
    }
}

#[tokio::test]
async fn test_forest_serializes_for_tree_widget() {
    let temp_dir = TempDir::new().unwrap();
    let mut forest = indexed_forest(&temp_dir).await;
    prepare_view(&mut forest, &ids(&["ApexClass.Billing"]), Some("bill"));

    let json = serde_json::to_value(&forest).unwrap();

    let apex = &json[0];
    assert_eq!(apex["id"], "ApexClass");
    assert_eq!(apex["isFolder"], true);
    assert_eq!(apex["typeInfo"]["xmlName"], "ApexClass");
    assert_eq!(apex["selection"], "partiallyChecked");
    assert_eq!(apex["children"][1]["id"], "ApexClass.Billing");
    assert_eq!(apex["children"][1]["checked"], true);
    assert_eq!(apex["children"][0]["addClass"], "dynatree-hidden");

    let round_trip: Forest = serde_json::from_value(json).unwrap();
    assert_eq!(round_trip, forest);
}
