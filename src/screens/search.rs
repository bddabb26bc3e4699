//! Recipe search.
//!
//! The user types a free-text query, submits it, and gets back a list of
//! recommended recipes. Picking one opens its detail page.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::join_all;
use iced::widget::{button, column, container, image, row, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length};

use super::Effect;
use crate::api::PlannerApi;
use crate::error::{ApiError, ValidationError};
use crate::state::data::{RecipeId, RecipeSummary};
use crate::state::{Load, Notice, Session, Ticket, Tracker};

/// Width of a result thumbnail in the list
const THUMBNAIL_WIDTH: f32 = 160.0;

#[derive(Debug, Default)]
pub struct Search {
    query: String,
    results: Load<Vec<RecipeSummary>>,
    /// Set once the first search is submitted, so "no results" is only shown
    /// after an actual search
    searched: bool,
    /// Decoded thumbnails for the current results, keyed by image URL
    thumbnails: HashMap<String, image::Handle>,
    tracker: Tracker,
}

#[derive(Debug, Clone)]
pub enum Message {
    QueryChanged(String),
    Submit,
    Loaded(Ticket, Result<Vec<RecipeSummary>, ApiError>),
    ThumbnailsLoaded(Ticket, Vec<(String, Vec<u8>)>),
    Open(RecipeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Recommend { ticket: Ticket, query: String },
    Thumbnails { ticket: Ticket, urls: Vec<String> },
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current results, empty while loading or after a failure
    pub fn results(&self) -> &[RecipeSummary] {
        self.results.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.results.is_loading()
    }

    /// True when the last search came back empty
    pub fn no_results(&self) -> bool {
        self.searched && matches!(&self.results, Load::Loaded(recipes) if recipes.is_empty())
    }

    #[cfg(test)]
    pub fn has_thumbnail(&self, url: &str) -> bool {
        self.thumbnails.contains_key(url)
    }

    fn validated_query(&self) -> Result<String, ValidationError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        Ok(query.to_string())
    }

    pub fn update(&mut self, message: Message) -> Effect<Request> {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                Effect::None
            }
            Message::Submit => match self.validated_query() {
                Ok(query) => {
                    tracing::info!(query = %query, "searching recipes");
                    self.searched = true;
                    self.results = Load::Loading;
                    let ticket = self.tracker.issue();
                    Effect::Request(Request::Recommend { ticket, query })
                }
                Err(error) => {
                    tracing::debug!(%error, "search not submitted");
                    Effect::None
                }
            },
            Message::Loaded(ticket, result) => {
                if !self.tracker.is_latest(ticket) {
                    tracing::debug!("discarding stale search results");
                    return Effect::None;
                }
                match result {
                    Ok(recipes) => {
                        tracing::info!(count = recipes.len(), "search results received");
                        self.thumbnails.retain(|url, _| {
                            recipes.iter().any(|r| r.image.as_deref() == Some(url.as_str()))
                        });
                        let mut urls: Vec<String> = Vec::new();
                        for url in recipes.iter().filter_map(|r| r.image.as_ref()) {
                            if !self.thumbnails.contains_key(url) && !urls.contains(url) {
                                urls.push(url.clone());
                            }
                        }
                        self.results = Load::Loaded(recipes);
                        if urls.is_empty() {
                            Effect::None
                        } else {
                            Effect::Request(Request::Thumbnails { ticket, urls })
                        }
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to fetch recommendations");
                        self.results = Load::Failed(error.to_string());
                        Effect::Notify(Notice::error(
                            "Search failed",
                            "Could not fetch recommendations. Please try again.",
                        ))
                    }
                }
            }
            Message::ThumbnailsLoaded(ticket, images) => {
                if self.tracker.is_latest(ticket) {
                    for (url, bytes) in images {
                        self.thumbnails.insert(url, image::Handle::from_bytes(bytes));
                    }
                }
                Effect::None
            }
            Message::Open(id) => Effect::OpenRecipe(id),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let input = text_input("e.g., healthy chicken dinner under 30 mins", &self.query)
            .on_input(Message::QueryChanged)
            .on_submit(Message::Submit)
            .padding(10);

        let mut submit = button("Find Meals").padding(10);
        if !self.is_loading() {
            submit = submit.on_press(Message::Submit);
        }

        let content: Element<'_, Message> = if self.is_loading() {
            text("Finding meals...").into()
        } else if self.no_results() {
            text("No recipes found. Try a different search!").into()
        } else {
            let cards = self.results().iter().map(|recipe| self.card(recipe));
            scrollable(Column::with_children(cards).spacing(12))
                .height(Length::Fill)
                .into()
        };

        column![row![input, submit].spacing(10), content]
            .spacing(20)
            .padding(20)
            .into()
    }

    fn card<'a>(&'a self, recipe: &'a RecipeSummary) -> Element<'a, Message> {
        let thumbnail = recipe
            .image
            .as_ref()
            .and_then(|url| self.thumbnails.get(url));

        let picture: Element<'a, Message> = match thumbnail {
            Some(handle) => image(handle.clone())
                .width(Length::Fixed(THUMBNAIL_WIDTH))
                .into(),
            None => container(text("No image").size(12))
                .width(Length::Fixed(THUMBNAIL_WIDTH))
                .padding(30)
                .into(),
        };

        button(
            row![picture, text(&recipe.title).size(18)]
                .spacing(16)
                .align_y(Alignment::Center),
        )
        .on_press(Message::Open(recipe.id))
        .style(button::secondary)
        .width(Length::Fill)
        .into()
    }
}

/// Perform a search request against the backend
pub async fn perform(api: Arc<dyn PlannerApi>, session: Session, request: Request) -> Message {
    match request {
        Request::Recommend { ticket, query } => {
            Message::Loaded(ticket, api.recommend(&session, &query).await)
        }
        Request::Thumbnails { ticket, urls } => {
            let downloads = urls.into_iter().map(|url| {
                let api = api.clone();
                async move {
                    let result = api.fetch_image(&url).await;
                    (url, result)
                }
            });

            let images = join_all(downloads)
                .await
                .into_iter()
                .filter_map(|(url, result)| match result {
                    Ok(bytes) => Some((url, bytes)),
                    Err(error) => {
                        tracing::debug!(%url, %error, "thumbnail download failed");
                        None
                    }
                })
                .collect();

            Message::ThumbnailsLoaded(ticket, images)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{Call, MockApi};
    use crate::screens::settle;
    use crate::state::data::UserId;

    fn session() -> Session {
        Session::new(UserId(1))
    }

    fn recipe(id: u64, title: &str) -> RecipeSummary {
        RecipeSummary {
            id: RecipeId(id),
            title: title.to_string(),
            image: Some(format!("https://img.example/{id}.jpg")),
        }
    }

    async fn submit(search: &mut Search, api: &Arc<MockApi>, query: &str) -> Effect<Request> {
        let api: Arc<dyn PlannerApi> = api.clone();
        search.update(Message::QueryChanged(query.to_string()));
        settle(
            |m| search.update(m),
            |r| perform(api.clone(), session(), r),
            Message::Submit,
        )
        .await
    }

    #[tokio::test]
    async fn test_blank_query_issues_no_request() {
        let api = Arc::new(MockApi::new().with_recipes(vec![recipe(1, "Soup")]));
        let mut search = Search::new();

        for query in ["", "   ", "\t\n"] {
            assert_eq!(submit(&mut search, &api, query).await, Effect::None);
        }

        assert!(api.calls().is_empty());
        assert!(search.results().is_empty());
        assert!(!search.no_results());
    }

    #[tokio::test]
    async fn test_search_renders_results_with_thumbnails() {
        let api = Arc::new(
            MockApi::new()
                .with_recipes(vec![recipe(11, "Pasta Primavera"), recipe(12, "Pasta Carbonara")])
                .with_image("https://img.example/11.jpg", b"jpeg-11")
                .with_image("https://img.example/12.jpg", b"jpeg-12"),
        );
        let mut search = Search::new();

        let effect = submit(&mut search, &api, "pasta").await;

        assert_eq!(effect, Effect::None);
        let titles: Vec<&str> = search.results().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Pasta Primavera", "Pasta Carbonara"]);
        assert!(search.has_thumbnail("https://img.example/11.jpg"));
        assert!(search.has_thumbnail("https://img.example/12.jpg"));
        assert_eq!(api.calls()[0], Call::Recommend("pasta".to_string()));

        assert_eq!(
            search.update(Message::Open(RecipeId(12))),
            Effect::OpenRecipe(RecipeId(12))
        );
    }

    #[tokio::test]
    async fn test_missing_thumbnail_is_not_fatal() {
        let api = Arc::new(MockApi::new().with_recipes(vec![recipe(1, "Soup")]));
        let mut search = Search::new();

        assert_eq!(submit(&mut search, &api, "soup").await, Effect::None);
        assert_eq!(search.results().len(), 1);
        assert!(!search.has_thumbnail("https://img.example/1.jpg"));
    }

    #[tokio::test]
    async fn test_empty_response_flags_no_results() {
        let api = Arc::new(MockApi::new());
        let mut search = Search::new();

        submit(&mut search, &api, "durian ice cream").await;

        assert!(search.no_results());
        assert!(!search.is_loading());
    }

    #[tokio::test]
    async fn test_failure_clears_results_and_notifies() {
        let api = Arc::new(MockApi::new().with_recipes(vec![recipe(1, "Soup")]));
        let mut search = Search::new();
        submit(&mut search, &api, "soup").await;
        assert_eq!(search.results().len(), 1);

        api.fail_with(ApiError::Transport("connection refused".to_string()));
        let effect = submit(&mut search, &api, "stew").await;

        match effect {
            Effect::Notify(notice) => assert!(notice.is_error()),
            other => panic!("expected a notice, got {other:?}"),
        }
        assert!(search.results().is_empty());
        assert!(!search.no_results());

        api.recover();
        assert_eq!(submit(&mut search, &api, "soup").await, Effect::None);
        assert_eq!(search.results().len(), 1);
    }

    #[test]
    fn test_only_latest_search_is_applied() {
        let mut search = Search::new();

        search.update(Message::QueryChanged("soup".to_string()));
        let Effect::Request(Request::Recommend { ticket: first, .. }) = search.update(Message::Submit) else {
            panic!("expected a request");
        };
        search.update(Message::QueryChanged("stew".to_string()));
        let Effect::Request(Request::Recommend { ticket: second, .. }) = search.update(Message::Submit) else {
            panic!("expected a request");
        };

        // Replies arrive out of order: the newer one first
        let stew = RecipeSummary { image: None, ..recipe(2, "Stew") };
        let soup = RecipeSummary { image: None, ..recipe(1, "Soup") };
        search.update(Message::Loaded(second, Ok(vec![stew.clone()])));
        search.update(Message::Loaded(first, Ok(vec![soup])));

        assert_eq!(search.results(), &[stew]);
    }

    #[test]
    fn test_new_results_drop_unused_thumbnails() {
        let mut search = Search::new();
        search.update(Message::QueryChanged("pasta".to_string()));
        let Effect::Request(Request::Recommend { ticket: first, .. }) = search.update(Message::Submit) else {
            panic!("expected a request");
        };
        search.update(Message::Loaded(first, Ok(vec![recipe(11, "Primavera"), recipe(12, "Carbonara")])));
        search.update(Message::ThumbnailsLoaded(
            first,
            vec![
                ("https://img.example/11.jpg".to_string(), b"jpeg-11".to_vec()),
                ("https://img.example/12.jpg".to_string(), b"jpeg-12".to_vec()),
            ],
        ));

        let Effect::Request(Request::Recommend { ticket: second, .. }) = search.update(Message::Submit) else {
            panic!("expected a request");
        };
        let effect = search.update(Message::Loaded(second, Ok(vec![recipe(12, "Carbonara"), recipe(13, "Ragu")])));

        assert!(!search.has_thumbnail("https://img.example/11.jpg"));
        assert!(search.has_thumbnail("https://img.example/12.jpg"));
        // Only the new picture is downloaded
        assert_eq!(
            effect,
            Effect::Request(Request::Thumbnails {
                ticket: second,
                urls: vec!["https://img.example/13.jpg".to_string()],
            })
        );
    }

    #[test]
    fn test_submit_disabled_state_while_loading() {
        let mut search = Search::new();
        search.update(Message::QueryChanged("pasta".to_string()));
        search.update(Message::Submit);
        assert!(search.is_loading());
        assert!(search.results().is_empty());
    }
}
