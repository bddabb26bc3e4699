//! Shared data structures for the application state
//!
//! These structs mirror what the backend owns. The client never persists
//! them; they live as long as the screen that fetched them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend id of a recipe
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RecipeId(pub u64);

/// Backend id of the signed-in user
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Backend id of a pantry item
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PantryItemId(pub u64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PantryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One search hit
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    /// Absolute image URL, when the backend has one
    #[serde(default)]
    pub image: Option<String>,
}

/// Full recipe as shown on the detail page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    /// Ingredient lines in recipe order
    #[serde(default)]
    pub extended_ingredients: Vec<IngredientLine>,
    /// May contain HTML markup, strip before display
    #[serde(default)]
    pub instructions: Option<String>,
}

/// A single ingredient line, e.g. "2 cups of flour"
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct IngredientLine {
    #[serde(default)]
    pub id: Option<u64>,
    pub original: String,
}

/// An item in the user's pantry
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PantryItem {
    pub id: PantryItemId,
    pub item_name: String,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

/// Payload for creating a pantry item (the backend assigns the id)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewPantryItem {
    pub item_name: String,
    pub expiry_date: Option<NaiveDate>,
}

/// Taste profile as sent to and returned by the backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub household_size: u32,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub health_goals: Vec<String>,
}

/// A line on the shopping list
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShoppingListItem {
    pub name: String,
    #[serde(default)]
    pub substitution: Option<Substitution>,
}

/// A cheaper alternative the backend suggests for a shopping list item
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Substitution {
    pub name: String,
    pub savings: Savings,
}

/// Savings amount. The backend sends it as a string ("0.80"), but a number
/// is accepted too.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Savings {
    Text(String),
    Amount(f64),
}

impl fmt::Display for Savings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Savings::Text(text) => write!(f, "{}", text),
            Savings::Amount(amount) => write!(f, "{:.2}", amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_detail_from_backend_json() {
        let json = r#"{
            "id": 715538,
            "title": "Bruschetta",
            "image": "https://img.example/715538.jpg",
            "readyInMinutes": 35,
            "servings": 6,
            "extendedIngredients": [
                {"id": 1, "original": "1 baguette"},
                {"id": 2, "original": "4 tomatoes"}
            ],
            "instructions": "<ol><li>Toast</li></ol>",
            "vegan": true
        }"#;

        let detail: RecipeDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id, RecipeId(715538));
        assert_eq!(detail.ready_in_minutes, Some(35));
        assert_eq!(detail.extended_ingredients.len(), 2);
        assert_eq!(detail.extended_ingredients[1].original, "4 tomatoes");
    }

    #[test]
    fn test_recipe_detail_tolerates_null_instructions() {
        let json = r#"{"id": 1, "title": "Toast", "image": null, "instructions": null}"#;
        let detail: RecipeDetail = serde_json::from_str(json).unwrap();
        assert!(detail.instructions.is_none());
        assert!(detail.extended_ingredients.is_empty());
    }

    #[test]
    fn test_pantry_item_dates() {
        let json = r#"[
            {"id": 1, "item_name": "milk", "expiry_date": "2024-06-01", "user_id": 1},
            {"id": 2, "item_name": "rice", "expiry_date": null, "user_id": 1}
        ]"#;
        let items: Vec<PantryItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].expiry_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(items[1].expiry_date, None);
    }

    #[test]
    fn test_new_pantry_item_sends_null_expiry() {
        let item = NewPantryItem {
            item_name: "eggs".to_string(),
            expiry_date: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({"item_name": "eggs", "expiry_date": null}));
    }

    #[test]
    fn test_savings_display() {
        let text: Savings = serde_json::from_str(r#""0.80""#).unwrap();
        let number: Savings = serde_json::from_str("0.5").unwrap();
        assert_eq!(text.to_string(), "0.80");
        assert_eq!(number.to_string(), "0.50");
    }
}
