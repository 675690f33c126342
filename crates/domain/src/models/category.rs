//! Dish category domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A display grouping for dishes. Category names are unique platform-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}
