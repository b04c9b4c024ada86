// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic names and display labels.

use serde::{Deserialize, Serialize};

pub const CORE_DATA_TOPIC: &str = "CoreDataTopic";
pub const CORE_DATA2_TOPIC: &str = "CoreData2Topic";
pub const CORE_DATA3_TOPIC: &str = "CoreData3Topic";
pub const CORE_DATA4_TOPIC: &str = "CoreData4Topic";
pub const INTELLIGENCE_TOPIC: &str = "IntelligenceTopic";
pub const MESSAGING_TOPIC: &str = "MessagingTopic";

/// The three sample schemas the monitor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    CoreData,
    Intelligence,
    Messaging,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::CoreData,
        RecordKind::Intelligence,
        RecordKind::Messaging,
    ];

    /// Topics carrying this record kind, canonical name first.
    pub fn topics(self) -> &'static [&'static str] {
        match self {
            RecordKind::CoreData => &[
                CORE_DATA_TOPIC,
                CORE_DATA2_TOPIC,
                CORE_DATA3_TOPIC,
                CORE_DATA4_TOPIC,
            ],
            RecordKind::Intelligence => &[INTELLIGENCE_TOPIC],
            RecordKind::Messaging => &[MESSAGING_TOPIC],
        }
    }

    /// Display label for a sample received on `topic`.
    pub fn label(self, topic: &str) -> &'static str {
        match self {
            RecordKind::CoreData => classify_core_data(topic),
            RecordKind::Intelligence => "intelligence",
            RecordKind::Messaging => "messaging",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::CoreData => "core_data",
            RecordKind::Intelligence => "intelligence",
            RecordKind::Messaging => "messaging",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest topic name accepted.
pub const MAX_TOPIC_NAME_LEN: usize = 256;

/// Check `name` against the DDS topic name grammar: a letter, `_` or `/`,
/// then letters, digits, `_` or `/`.
pub fn validate_topic_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err("topic name is empty".to_string());
    };
    if name.len() > MAX_TOPIC_NAME_LEN {
        return Err(format!("topic name longer than {} bytes", MAX_TOPIC_NAME_LEN));
    }
    if !(first.is_ascii_alphabetic() || first == '_' || first == '/') {
        return Err(format!("topic name '{}' must start with a letter, '_' or '/'", name));
    }
    match chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '/')) {
        Some(bad) => Err(format!("topic name '{}' contains '{}'", name, bad)),
        None => Ok(()),
    }
}

/// Topic names subscribed for each record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTable {
    core_data: Vec<String>,
    intelligence: Vec<String>,
    messaging: Vec<String>,
}

impl TopicTable {
    /// The six fixed topics.
    pub fn standard() -> Self {
        let owned = |kind: RecordKind| kind.topics().iter().map(|t| t.to_string()).collect();
        Self {
            core_data: owned(RecordKind::CoreData),
            intelligence: owned(RecordKind::Intelligence),
            messaging: owned(RecordKind::Messaging),
        }
    }

    /// Replace the topics subscribed for `kind`.
    pub fn with_topics<I, S>(mut self, kind: RecordKind, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let topics = topics.into_iter().map(Into::into).collect();
        match kind {
            RecordKind::CoreData => self.core_data = topics,
            RecordKind::Intelligence => self.intelligence = topics,
            RecordKind::Messaging => self.messaging = topics,
        }
        self
    }

    pub fn topics(&self, kind: RecordKind) -> &[String] {
        match kind {
            RecordKind::CoreData => &self.core_data,
            RecordKind::Intelligence => &self.intelligence,
            RecordKind::Messaging => &self.messaging,
        }
    }

    pub fn len(&self) -> usize {
        self.core_data.len() + self.intelligence.len() + self.messaging.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TopicTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Label for a core-data topic. Only the three numbered variants get their
/// own label; every other name, canonical included, is plain `coredata`.
pub fn classify_core_data(topic: &str) -> &'static str {
    match topic {
        CORE_DATA2_TOPIC => "aircraft coredata2",
        CORE_DATA3_TOPIC => "aircraft coredata3",
        CORE_DATA4_TOPIC => "aircraft coredata4",
        _ => "aircraft coredata",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_variants_get_their_label() {
        assert_eq!(classify_core_data("CoreData2Topic"), "aircraft coredata2");
        assert_eq!(classify_core_data("CoreData3Topic"), "aircraft coredata3");
        assert_eq!(classify_core_data("CoreData4Topic"), "aircraft coredata4");
    }

    #[test]
    fn test_other_names_get_generic_label() {
        for topic in ["CoreDataTopic", "", "coredata2topic", "CoreData5Topic", "MessagingTopic"] {
            assert_eq!(classify_core_data(topic), "aircraft coredata", "{topic}");
        }
    }

    #[test]
    fn test_fixed_labels_for_other_kinds() {
        assert_eq!(RecordKind::Intelligence.label("anything"), "intelligence");
        assert_eq!(RecordKind::Messaging.label(CORE_DATA2_TOPIC), "messaging");
        assert_eq!(RecordKind::CoreData.label(CORE_DATA4_TOPIC), "aircraft coredata4");
    }

    #[test]
    fn test_six_topics_in_total() {
        let total: usize = RecordKind::ALL.iter().map(|k| k.topics().len()).sum();
        assert_eq!(total, 6);
        assert_eq!(RecordKind::CoreData.topics()[0], CORE_DATA_TOPIC);
    }

    #[test]
    fn test_standard_table_matches_fixed_topics() {
        let table = TopicTable::standard();
        assert_eq!(table.len(), 6);
        for kind in RecordKind::ALL {
            assert_eq!(table.topics(kind), kind.topics());
        }

        let table = table.with_topics(RecordKind::Messaging, ["Chat"]);
        assert_eq!(table.topics(RecordKind::Messaging).to_vec(), vec!["Chat".to_string()]);
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_fixed_topic_names_are_valid() {
        for kind in RecordKind::ALL {
            for topic in kind.topics() {
                assert_eq!(validate_topic_name(topic), Ok(()));
            }
        }
        assert_eq!(validate_topic_name("rt/chatter_2"), Ok(()));
    }

    #[test]
    fn test_malformed_topic_names_rejected() {
        assert!(validate_topic_name("").is_err());
        assert!(validate_topic_name("2Fast").is_err());
        assert!(validate_topic_name("Intelligence Topic").is_err());
        assert!(validate_topic_name("Core*").is_err());
        assert!(validate_topic_name(&"a".repeat(MAX_TOPIC_NAME_LEN + 1)).is_err());
        assert!(validate_topic_name(&"a".repeat(MAX_TOPIC_NAME_LEN)).is_ok());
    }
}
