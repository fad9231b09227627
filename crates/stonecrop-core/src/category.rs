use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Personal,
    Work,
}

impl CategoryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal",
            Self::Work => "Work",
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Work => "work",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "personal" => Some(Self::Personal),
            "work" => Some(Self::Work),
            _ => None,
        }
    }
}

/// A row of the remote `categories` table. The kind is immutable after
/// creation; there is no edit operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

/// Insert payload for the `categories` table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

impl CategoryDraft {
    /// Returns `None` on an empty trimmed name; the caller treats that as a
    /// silent no-op rather than an error.
    pub fn new(name: &str, kind: CategoryKind) -> Option<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            name: trimmed.to_string(),
            kind,
        })
    }
}

/// Resolved display info for a task's category reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub name: String,
    pub kind: CategoryKind,
}

/// Looks up a category by id. A dangling reference (the category was
/// deleted) resolves to the "Unknown"/personal sentinel so the UI never
/// renders a blank label.
pub fn category_info(categories: &[Category], id: CategoryId) -> CategoryInfo {
    categories
        .iter()
        .find(|category| category.id == id)
        .map(|category| CategoryInfo {
            name: category.name.clone(),
            kind: category.kind,
        })
        .unwrap_or_else(|| CategoryInfo {
            name: "Unknown".to_string(),
            kind: CategoryKind::Personal,
        })
}
