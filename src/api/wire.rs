//! Request and response envelopes that only exist on the wire.

use crate::state::data::{RecipeSummary, ShoppingListItem, UserId};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct RecommendRequest<'a> {
    pub user_id: UserId,
    pub query_text: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct Recommendations {
    #[serde(default)]
    pub recipes: Vec<RecipeSummary>,
}

#[derive(Deserialize, Debug)]
pub struct AddedItems {
    #[serde(default)]
    pub added_items: Vec<AddedItem>,
}

/// The backend reports added items as full shopping list entries; older
/// builds sent bare names.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum AddedItem {
    Name(String),
    Item(ShoppingListItem),
}

impl AddedItem {
    pub fn into_name(self) -> String {
        match self {
            AddedItem::Name(name) => name,
            AddedItem::Item(item) => item.name,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct MissingIngredients {
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_items_accepts_names_and_objects() {
        let json = r#"{"added_items": [
            "2 cups milk",
            {"name": "3 eggs", "substitution": {"name": "Great Value Large White Eggs", "savings": "0.65"}}
        ]}"#;

        let added: AddedItems = serde_json::from_str(json).unwrap();
        let names: Vec<String> = added.added_items.into_iter().map(AddedItem::into_name).collect();
        assert_eq!(names, vec!["2 cups milk", "3 eggs"]);
    }

    #[test]
    fn test_recommend_request_body() {
        let body = RecommendRequest {
            user_id: UserId(1),
            query_text: "pasta",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"user_id": 1, "query_text": "pasta"})
        );
    }
}
