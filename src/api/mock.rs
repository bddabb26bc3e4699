//! In-memory backend for tests.
//!
//! Behaves like the real backend for the pantry and shopping list (mutations
//! are visible to later reads) and serves canned data everywhere else. Every
//! call is recorded so tests can assert on what went over the "wire".

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::ApiError;
use crate::state::data::{
    NewPantryItem, PantryItem, PantryItemId, RecipeDetail, RecipeId, RecipeSummary,
    ShoppingListItem, UserProfile,
};
use crate::state::Session;

use super::PlannerApi;

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Recommend(String),
    Recipe(RecipeId),
    Pantry,
    AddPantryItem(NewPantryItem),
    DeletePantryItem(PantryItemId),
    UpdateProfile(UserProfile),
    ShoppingList,
    AddMissing(RecipeId),
    Missing(RecipeId),
    Image(String),
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    recipes: Vec<RecipeSummary>,
    details: HashMap<RecipeId, RecipeDetail>,
    pantry: Vec<PantryItem>,
    next_item_id: u64,
    shopping: Vec<ShoppingListItem>,
    missing: HashMap<RecipeId, Vec<String>>,
    images: HashMap<String, Vec<u8>>,
    failure: Option<ApiError>,
}

#[derive(Default)]
pub struct MockApi {
    inner: Mutex<Inner>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results for every `recommend` call
    pub fn with_recipes(self, recipes: Vec<RecipeSummary>) -> Self {
        self.inner.lock().unwrap().recipes = recipes;
        self
    }

    pub fn with_detail(self, detail: RecipeDetail) -> Self {
        self.inner.lock().unwrap().details.insert(detail.id, detail);
        self
    }

    pub fn with_pantry(self, items: Vec<PantryItem>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.next_item_id = items.iter().map(|i| i.id.0).max().unwrap_or(0);
            inner.pantry = items;
        }
        self
    }

    pub fn with_shopping_list(self, items: Vec<ShoppingListItem>) -> Self {
        self.inner.lock().unwrap().shopping = items;
        self
    }

    /// Ingredients of `recipe` the user does not have yet
    pub fn with_missing(self, recipe: RecipeId, names: &[&str]) -> Self {
        self.inner
            .lock()
            .unwrap()
            .missing
            .insert(recipe, names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_image(self, url: &str, bytes: &[u8]) -> Self {
        self.inner.lock().unwrap().images.insert(url.to_string(), bytes.to_vec());
        self
    }

    /// Make every following call fail with `error`
    pub fn fail_with(&self, error: ApiError) {
        self.inner.lock().unwrap().failure = Some(error);
    }

    pub fn recover(&self) {
        self.inner.lock().unwrap().failure = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Mutate the shopping list behind the screen's back
    pub fn set_shopping_list(&self, items: Vec<ShoppingListItem>) {
        self.inner.lock().unwrap().shopping = items;
    }

    fn record(&self, call: Call) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        if let Some(error) = inner.failure.clone() {
            return Err(error);
        }
        Ok(inner)
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        body: r#"{"detail":"Not found"}"#.to_string(),
    }
}

#[async_trait]
impl PlannerApi for MockApi {
    async fn recommend(&self, _session: &Session, query: &str) -> Result<Vec<RecipeSummary>, ApiError> {
        let inner = self.record(Call::Recommend(query.to_string()))?;
        Ok(inner.recipes.clone())
    }

    async fn recipe(&self, id: RecipeId) -> Result<RecipeDetail, ApiError> {
        let inner = self.record(Call::Recipe(id))?;
        inner.details.get(&id).cloned().ok_or_else(not_found)
    }

    async fn pantry(&self, _session: &Session) -> Result<Vec<PantryItem>, ApiError> {
        let inner = self.record(Call::Pantry)?;
        Ok(inner.pantry.clone())
    }

    async fn add_pantry_item(&self, _session: &Session, item: &NewPantryItem) -> Result<PantryItem, ApiError> {
        let mut inner = self.record(Call::AddPantryItem(item.clone()))?;
        inner.next_item_id += 1;
        let created = PantryItem {
            id: PantryItemId(inner.next_item_id),
            item_name: item.item_name.clone(),
            expiry_date: item.expiry_date,
        };
        inner.pantry.push(created.clone());
        Ok(created)
    }

    async fn delete_pantry_item(&self, id: PantryItemId) -> Result<(), ApiError> {
        let mut inner = self.record(Call::DeletePantryItem(id))?;
        let before = inner.pantry.len();
        inner.pantry.retain(|item| item.id != id);
        if inner.pantry.len() == before {
            return Err(not_found());
        }
        Ok(())
    }

    async fn update_profile(&self, _session: &Session, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        let _inner = self.record(Call::UpdateProfile(profile.clone()))?;
        Ok(profile.clone())
    }

    async fn shopping_list(&self, _session: &Session) -> Result<Vec<ShoppingListItem>, ApiError> {
        let inner = self.record(Call::ShoppingList)?;
        Ok(inner.shopping.clone())
    }

    async fn add_missing_ingredients(&self, _session: &Session, recipe: RecipeId) -> Result<Vec<String>, ApiError> {
        let mut inner = self.record(Call::AddMissing(recipe))?;
        let names = inner.missing.get(&recipe).cloned().unwrap_or_default();
        inner.shopping.extend(names.iter().map(|name| ShoppingListItem {
            name: name.clone(),
            substitution: None,
        }));
        Ok(names)
    }

    async fn missing_ingredients(&self, _session: &Session, recipe: RecipeId) -> Result<Vec<String>, ApiError> {
        let inner = self.record(Call::Missing(recipe))?;
        Ok(inner.missing.get(&recipe).cloned().unwrap_or_default())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let inner = self.record(Call::Image(url.to_string()))?;
        inner.images.get(url).cloned().ok_or_else(not_found)
    }
}
