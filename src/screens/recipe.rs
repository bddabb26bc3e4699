//! Recipe detail page, pushed on top of the tabs from a search result.

use std::sync::Arc;

use iced::widget::{button, column, image, row, scrollable, text, Column};
use iced::{Element, Length};

use super::Effect;
use crate::api::PlannerApi;
use crate::error::ApiError;
use crate::markup::strip_markup;
use crate::state::data::{RecipeDetail, RecipeId};
use crate::state::{Load, Notice, Session, Ticket, Tracker};

#[derive(Debug)]
pub struct RecipePage {
    id: RecipeId,
    detail: Load<RecipeDetail>,
    image: Option<image::Handle>,
    /// Smart-cart preview of what the user is missing
    missing: Load<Vec<String>>,
    /// Names added by the last "add missing" call
    added: Load<Vec<String>>,
    /// Tickets for the detail fetch and its image
    loads: Tracker,
    /// Tickets for the shopping list actions
    actions: Tracker,
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Ticket, Result<RecipeDetail, ApiError>),
    ImageLoaded(Ticket, Result<Vec<u8>, ApiError>),
    CheckMissing,
    MissingLoaded(Ticket, Result<Vec<String>, ApiError>),
    AddMissing,
    MissingAdded(Ticket, Result<Vec<String>, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Detail { ticket: Ticket, id: RecipeId },
    Image { ticket: Ticket, url: String },
    Missing { ticket: Ticket, id: RecipeId },
    AddMissing { ticket: Ticket, id: RecipeId },
}

impl RecipePage {
    /// Open the page for `id`. The returned request fetches the recipe.
    pub fn open(id: RecipeId) -> (Self, Request) {
        let mut page = Self {
            id,
            detail: Load::Loading,
            image: None,
            missing: Load::Idle,
            added: Load::Idle,
            loads: Tracker::new(),
            actions: Tracker::new(),
        };
        let ticket = page.loads.issue();
        (page, Request::Detail { ticket, id })
    }

    pub fn id(&self) -> RecipeId {
        self.id
    }

    pub fn detail(&self) -> Option<&RecipeDetail> {
        self.detail.value()
    }

    pub fn is_loading(&self) -> bool {
        self.detail.is_loading()
    }

    pub fn is_not_found(&self) -> bool {
        self.detail.is_failed()
    }

    #[cfg(test)]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    #[cfg(test)]
    pub fn missing(&self) -> Option<&[String]> {
        self.missing.value().map(Vec::as_slice)
    }

    /// Instructions with markup removed
    pub fn instructions(&self) -> Option<String> {
        self.detail()
            .and_then(|detail| detail.instructions.as_deref())
            .map(strip_markup)
    }

    /// The page is going away; replies that land afterwards are ignored
    pub fn unmount(&mut self) {
        self.loads.invalidate();
        self.actions.invalidate();
    }

    pub fn update(&mut self, message: Message) -> Effect<Request> {
        match message {
            Message::Loaded(ticket, result) => {
                if !self.loads.is_latest(ticket) {
                    tracing::debug!(id = %self.id, "discarding late recipe detail");
                    return Effect::None;
                }
                match result {
                    Ok(detail) => {
                        tracing::debug!(id = %self.id, title = %detail.title, "recipe detail received");
                        let image = detail.image.clone();
                        self.detail = Load::Loaded(detail);
                        match image {
                            Some(url) => Effect::Request(Request::Image { ticket, url }),
                            None => Effect::None,
                        }
                    }
                    Err(error) => {
                        tracing::warn!(id = %self.id, %error, "failed to fetch recipe details");
                        self.detail = Load::Failed(error.to_string());
                        Effect::Notify(Notice::error("Recipe", "Could not load this recipe."))
                    }
                }
            }
            Message::ImageLoaded(ticket, result) => {
                if !self.loads.is_live(ticket) {
                    return Effect::None;
                }
                match result {
                    Ok(bytes) => self.image = Some(image::Handle::from_bytes(bytes)),
                    Err(error) => tracing::debug!(id = %self.id, %error, "recipe image unavailable"),
                }
                Effect::None
            }
            Message::CheckMissing => {
                self.missing = Load::Loading;
                Effect::Request(Request::Missing {
                    ticket: self.actions.issue(),
                    id: self.id,
                })
            }
            Message::MissingLoaded(ticket, result) => {
                if !self.actions.is_live(ticket) {
                    return Effect::None;
                }
                match result {
                    Ok(names) => {
                        self.missing = Load::Loaded(names);
                        Effect::None
                    }
                    Err(error) => {
                        tracing::warn!(id = %self.id, %error, "failed to fetch missing ingredients");
                        self.missing = Load::Failed(error.to_string());
                        Effect::Notify(Notice::error("Error", "Could not check your pantry."))
                    }
                }
            }
            Message::AddMissing => {
                if self.added.is_loading() {
                    return Effect::None;
                }
                tracing::info!(id = %self.id, "adding missing ingredients to shopping list");
                self.added = Load::Loading;
                Effect::Request(Request::AddMissing {
                    ticket: self.actions.issue(),
                    id: self.id,
                })
            }
            Message::MissingAdded(ticket, result) => {
                if !self.actions.is_live(ticket) {
                    return Effect::None;
                }
                match result {
                    Ok(names) => {
                        let body = format!(
                            "Added {} missing item(s) to your shopping list.",
                            names.len()
                        );
                        self.added = Load::Loaded(names);
                        Effect::Notify(Notice::success("Success!", body))
                    }
                    Err(error) => {
                        tracing::warn!(id = %self.id, %error, "failed to add missing ingredients");
                        self.added = Load::Failed(error.to_string());
                        Effect::Notify(Notice::error("Error", "Could not add items to your list."))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        if self.is_not_found() {
            return text("Recipe not found.").into();
        }
        if self.is_loading() {
            return text("Loading recipe...").into();
        }
        let Some(detail) = self.detail() else {
            return text("Loading recipe...").into();
        };

        let mut content = Column::new().spacing(12).padding(20);

        if let Some(handle) = &self.image {
            content = content.push(image(handle.clone()).width(Length::Fill));
        }

        content = content.push(text(&detail.title).size(28));
        if let Some(minutes) = detail.ready_in_minutes {
            content = content.push(text(format!("Ready in: {} minutes", minutes)));
        }
        if let Some(servings) = detail.servings {
            content = content.push(text(format!("Servings: {}", servings)));
        }

        let mut add = button("Add Missing Ingredients to List").padding(10);
        if !self.added.is_loading() {
            add = add.on_press(Message::AddMissing);
        }
        let check = button("What am I missing?")
            .on_press(Message::CheckMissing)
            .style(button::secondary)
            .padding(10);
        content = content.push(row![add, check].spacing(10));

        match &self.missing {
            Load::Loading => content = content.push(text("Checking your pantry...").size(13)),
            Load::Loaded(names) if names.is_empty() => {
                content = content.push(text("You have everything for this recipe.").size(13))
            }
            Load::Loaded(names) => {
                content = content.push(text(format!("Missing: {}", names.join(", "))).size(13))
            }
            Load::Idle | Load::Failed(_) => {}
        }

        let ingredients = detail
            .extended_ingredients
            .iter()
            .map(|line| text(format!("• {}", line.original)).into());
        content = content
            .push(text("Ingredients").size(20))
            .push(Column::with_children(ingredients).spacing(4));

        if let Some(instructions) = self.instructions() {
            content = content
                .push(text("Instructions").size(20))
                .push(text(instructions));
        }

        scrollable(column![content]).height(Length::Fill).into()
    }
}

/// Perform a recipe page request against the backend
pub async fn perform(api: Arc<dyn PlannerApi>, session: Session, request: Request) -> Message {
    match request {
        Request::Detail { ticket, id } => Message::Loaded(ticket, api.recipe(id).await),
        Request::Image { ticket, url } => Message::ImageLoaded(ticket, api.fetch_image(&url).await),
        Request::Missing { ticket, id } => {
            Message::MissingLoaded(ticket, api.missing_ingredients(&session, id).await)
        }
        Request::AddMissing { ticket, id } => {
            Message::MissingAdded(ticket, api.add_missing_ingredients(&session, id).await)
        }
    }
}
