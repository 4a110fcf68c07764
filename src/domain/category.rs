//! Domain types representing expense categories.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Label used whenever an expense has no category or points at a missing one.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Neutral color assigned to the uncategorized bucket.
pub const UNCATEGORIZED_COLOR: &str = "#9CA3AF";

/// Groups expenses for reporting. The seed set is effectively immutable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Category {
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}
