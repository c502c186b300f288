use serde::{Deserialize, Serialize};

/// One shopping-list line expanded from a meal's ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub checked: bool,
    /// Title of the source meal when the item was added.
    #[serde(default)]
    pub recipe: String,
}
