//! Backend API trait and its HTTP implementation.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ConfigError};
use crate::state::data::{
    NewPantryItem, PantryItem, PantryItemId, RecipeDetail, RecipeId, RecipeSummary,
    ShoppingListItem, UserProfile,
};
use crate::state::Session;

use super::wire::{AddedItem, AddedItems, MissingIngredients, RecommendRequest, Recommendations};

/// One method per backend endpoint, so screens can be tested against a mock.
///
/// Each call issues exactly one request. Nothing is retried, cached or
/// validated beyond decoding the body.
#[async_trait]
pub trait PlannerApi: Send + Sync {
    /// `POST /recommend`
    async fn recommend(&self, session: &Session, query: &str) -> Result<Vec<RecipeSummary>, ApiError>;

    /// `GET /recipe/{id}`
    async fn recipe(&self, id: RecipeId) -> Result<RecipeDetail, ApiError>;

    /// `GET /pantry/{userId}`
    async fn pantry(&self, session: &Session) -> Result<Vec<PantryItem>, ApiError>;

    /// `POST /pantry/{userId}`
    async fn add_pantry_item(&self, session: &Session, item: &NewPantryItem) -> Result<PantryItem, ApiError>;

    /// `DELETE /pantry/item/{itemId}`
    async fn delete_pantry_item(&self, id: PantryItemId) -> Result<(), ApiError>;

    /// `PATCH /users/{userId}/profile`
    async fn update_profile(&self, session: &Session, profile: &UserProfile) -> Result<UserProfile, ApiError>;

    /// `GET /shopping-list/{userId}`
    async fn shopping_list(&self, session: &Session) -> Result<Vec<ShoppingListItem>, ApiError>;

    /// `POST /shopping-list/{userId}/{recipeId}`, returns the names added
    async fn add_missing_ingredients(&self, session: &Session, recipe: RecipeId) -> Result<Vec<String>, ApiError>;

    /// `GET /smart-cart/{userId}/{recipeId}`, a preview of what would be added
    async fn missing_ingredients(&self, session: &Session, recipe: RecipeId) -> Result<Vec<String>, ApiError>;

    /// Download an image from an absolute URL (recipe pictures are hosted
    /// elsewhere, not on the backend)
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// Production client talking JSON over HTTP to the planner backend.
#[derive(Debug, Clone)]
pub struct HttpApi {
    /// Shared reqwest client for connection pooling.
    client: reqwest::Client,
    /// Always ends with `/` so relative joins append instead of replacing.
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("savvy-planner/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a backend path such as `pantry/1` against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Transport(format!("bad endpoint {path:?}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "backend request");
        Ok(self.client.request(method, url))
    }

    /// Send and turn non-2xx answers into `ApiError::Status`.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, body = %body, "backend request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PlannerApi for HttpApi {
    async fn recommend(&self, session: &Session, query: &str) -> Result<Vec<RecipeSummary>, ApiError> {
        let body = RecommendRequest {
            user_id: session.user_id,
            query_text: query,
        };
        let request = self.request(Method::POST, "recommend")?.json(&body);
        let recommendations: Recommendations = self.json(request).await?;
        Ok(recommendations.recipes)
    }

    async fn recipe(&self, id: RecipeId) -> Result<RecipeDetail, ApiError> {
        let request = self.request(Method::GET, &format!("recipe/{id}"))?;
        self.json(request).await
    }

    async fn pantry(&self, session: &Session) -> Result<Vec<PantryItem>, ApiError> {
        let request = self.request(Method::GET, &format!("pantry/{}", session.user_id))?;
        self.json(request).await
    }

    async fn add_pantry_item(&self, session: &Session, item: &NewPantryItem) -> Result<PantryItem, ApiError> {
        let request = self
            .request(Method::POST, &format!("pantry/{}", session.user_id))?
            .json(item);
        self.json(request).await
    }

    async fn delete_pantry_item(&self, id: PantryItemId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("pantry/item/{id}"))?;
        self.send(request).await?;
        Ok(())
    }

    async fn update_profile(&self, session: &Session, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        let request = self
            .request(Method::PATCH, &format!("users/{}/profile", session.user_id))?
            .json(profile);
        self.json(request).await
    }

    async fn shopping_list(&self, session: &Session) -> Result<Vec<ShoppingListItem>, ApiError> {
        let request = self.request(Method::GET, &format!("shopping-list/{}", session.user_id))?;
        self.json(request).await
    }

    async fn add_missing_ingredients(&self, session: &Session, recipe: RecipeId) -> Result<Vec<String>, ApiError> {
        let request = self.request(
            Method::POST,
            &format!("shopping-list/{}/{}", session.user_id, recipe),
        )?;
        let added: AddedItems = self.json(request).await?;
        Ok(added.added_items.into_iter().map(AddedItem::into_name).collect())
    }

    async fn missing_ingredients(&self, session: &Session, recipe: RecipeId) -> Result<Vec<String>, ApiError> {
        let request = self.request(
            Method::GET,
            &format!("smart-cart/{}/{}", session.user_id, recipe),
        )?;
        let missing: MissingIngredients = self.json(request).await?;
        Ok(missing.missing_ingredients)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = Url::parse(url).map_err(|e| ApiError::Transport(format!("bad image URL {url:?}: {e}")))?;
        tracing::debug!(%url, "image request");
        let response = self.send(self.client.get(url)).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_onto_base() {
        let api = HttpApi::new("http://192.168.1.9:8000").unwrap();
        assert_eq!(
            api.endpoint("pantry/item/3").unwrap().as_str(),
            "http://192.168.1.9:8000/pantry/item/3"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = HttpApi::new("https://example.com/api").unwrap();
        assert_eq!(api.base_url().as_str(), "https://example.com/api/");
        assert_eq!(
            api.endpoint("/shopping-list/1/42").unwrap().as_str(),
            "https://example.com/api/shopping-list/1/42"
        );
    }

    #[test]
    fn test_rejects_garbage_base_url() {
        assert!(matches!(
            HttpApi::new("::nope::"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Port 9 (discard) on localhost is closed in any sane test environment
        let api = HttpApi::new("http://127.0.0.1:9").unwrap();
        let err = api.recipe(RecipeId(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    }
}
