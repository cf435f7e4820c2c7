//! Fixed table of child declarations embedded in parent metadata files.
//!
//! A `CustomObject` file carries `<fields>`, `<listViews>`, ... elements; each
//! of those tags maps to a child metadata type that the index exposes as a
//! level-3 node.

use serde::{Deserialize, Serialize};

/// One trackable child tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildType {
    pub xml_name: String,
    pub tag_name: String,
    pub parent_xml_name: String,
}

impl ChildType {
    pub fn new(xml_name: &str, tag_name: &str, parent_xml_name: &str) -> Self {
        Self {
            xml_name: xml_name.to_string(),
            tag_name: tag_name.to_string(),
            parent_xml_name: parent_xml_name.to_string(),
        }
    }
}

/// `(xmlName, tagName, parentXmlName)`
const STANDARD_CHILD_TYPES: &[(&str, &str, &str)] = &[
    ("ActionOverride", "actionOverrides", "CustomObject"),
    ("CustomField", "fields", "CustomObject"),
    ("BusinessProcess", "businessProcesses", "CustomObject"),
    ("RecordType", "recordTypes", "CustomObject"),
    ("WebLink", "webLinks", "CustomObject"),
    ("ValidationRule", "validationRules", "CustomObject"),
    ("SearchLayouts", "searchLayouts", "CustomObject"),
    ("NamedFilter", "namedFilters", "CustomObject"),
    ("SharingReason", "sharingReasons", "CustomObject"),
    ("ListView", "listViews", "CustomObject"),
    ("FieldSet", "fieldSets", "CustomObject"),
    ("SharingRecalculation", "sharingRecalculations", "CustomObject"),
    ("CompactLayout", "compactLayouts", "CustomObject"),
    ("CustomLabel", "customLabels", "CustomLabels"),
    ("SharingCriteriaRule", "sharingCriteriaRules", "SharingRules"),
    ("SharingOwnerRule", "sharingOwnerRules", "SharingRules"),
    ("SharingTerritoryRule", "sharingTerritoryRules", "SharingRules"),
    ("WorkflowAlert", "alerts", "Workflow"),
    ("WorkflowTask", "tasks", "Workflow"),
    ("WorkflowOutboundMessage", "outboundMessages", "Workflow"),
    ("WorkflowFieldUpdate", "fieldUpdates", "Workflow"),
    ("WorkflowRule", "rules", "Workflow"),
    ("WorkflowEmailRecipient", "emailRecipients", "Workflow"),
    ("WorkflowTimeTrigger", "timeTriggers", "Workflow"),
    ("WorkflowActionReference", "actionReferences", "Workflow"),
];

/// Lookup of child tags by tag name.
#[derive(Debug, Clone, Default)]
pub struct ChildTypeCatalog {
    entries: Vec<ChildType>,
}

impl ChildTypeCatalog {
    pub fn new(entries: Vec<ChildType>) -> Self {
        Self { entries }
    }

    /// The platform's built-in child tags.
    pub fn standard() -> Self {
        let entries = STANDARD_CHILD_TYPES
            .iter()
            .map(|(xml, tag, parent)| ChildType::new(xml, tag, parent))
            .collect();
        Self { entries }
    }

    /// Find the child type declared by `tag_name`, if it is tracked.
    pub fn by_tag(&self, tag_name: &str) -> Option<&ChildType> {
        self.entries.iter().find(|c| c.tag_name == tag_name)
    }

    pub fn by_xml_name(&self, xml_name: &str) -> Option<&ChildType> {
        self.entries.iter().find(|c| c.xml_name == xml_name)
    }

    pub fn entries(&self) -> &[ChildType] {
        &self.entries
    }
}
