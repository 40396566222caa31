use serde::{Deserialize, Serialize};

/// Where newly created tasks are placed in the stored sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertOrder {
    /// Most recent first
    #[default]
    Prepend,
    Append,
}

/// Configuration from config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum task text length, in grapheme clusters
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
    #[serde(default)]
    pub insert_order: InsertOrder,
    /// Groups seeded when nothing is persisted yet
    #[serde(default = "default_groups")]
    pub default_groups: Vec<String>,
    #[serde(default = "default_title")]
    pub default_title: String,
    /// Group used when a task is added with no group and no groups exist
    #[serde(default = "default_fallback_group")]
    pub fallback_group: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            max_text_len: default_max_text_len(),
            insert_order: InsertOrder::default(),
            default_groups: default_groups(),
            default_title: default_title(),
            fallback_group: default_fallback_group(),
        }
    }
}

fn default_max_text_len() -> usize {
    200
}

fn default_groups() -> Vec<String> {
    vec!["Work".into(), "School".into(), "Errands".into()]
}

fn default_title() -> String {
    "My Tasks".into()
}

fn default_fallback_group() -> String {
    "Work".into()
}
