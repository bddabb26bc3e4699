//! Pantry list.
//!
//! Every mutation is followed by a full refetch; the list shown is always
//! what the backend last returned, never an optimistic local edit.

use std::sync::Arc;

use chrono::NaiveDate;
use iced::widget::{button, column, row, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length};

use super::Effect;
use crate::api::PlannerApi;
use crate::error::{ApiError, ValidationError};
use crate::state::data::{NewPantryItem, PantryItem, PantryItemId};
use crate::state::{Load, Notice, Session, Ticket, Tracker};

#[derive(Debug, Default)]
pub struct Pantry {
    items: Load<Vec<PantryItem>>,
    name: String,
    /// Optional `YYYY-MM-DD`
    expiry: String,
    /// Tickets for list fetches
    fetches: Tracker,
    /// Tickets for add/delete calls
    mutations: Tracker,
}

#[derive(Debug, Clone)]
pub enum Message {
    Mounted,
    Refresh,
    NameChanged(String),
    ExpiryChanged(String),
    Add,
    Delete(PantryItemId),
    Loaded(Ticket, Result<Vec<PantryItem>, ApiError>),
    Added(Ticket, Result<PantryItem, ApiError>),
    Deleted(Ticket, PantryItemId, Result<(), ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Fetch { ticket: Ticket },
    Add { ticket: Ticket, item: NewPantryItem },
    Delete { ticket: Ticket, id: PantryItemId },
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[PantryItem] {
        self.items.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.items.is_loading()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the add payload from the input fields
    fn draft(&self) -> Result<NewPantryItem, ValidationError> {
        let item_name = self.name.trim();
        if item_name.is_empty() {
            return Err(ValidationError::EmptyItemName);
        }

        let expiry = self.expiry.trim();
        let expiry_date = if expiry.is_empty() {
            None
        } else {
            let date = NaiveDate::parse_from_str(expiry, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidExpiry(expiry.to_string()))?;
            Some(date)
        };

        Ok(NewPantryItem {
            item_name: item_name.to_string(),
            expiry_date,
        })
    }

    fn fetch(&mut self) -> Effect<Request> {
        self.items = Load::Loading;
        Effect::Request(Request::Fetch {
            ticket: self.fetches.issue(),
        })
    }

    pub fn update(&mut self, message: Message) -> Effect<Request> {
        match message {
            Message::Mounted | Message::Refresh => self.fetch(),
            Message::NameChanged(name) => {
                self.name = name;
                Effect::None
            }
            Message::ExpiryChanged(expiry) => {
                self.expiry = expiry;
                Effect::None
            }
            Message::Add => match self.draft() {
                Ok(item) => {
                    tracing::info!(item = %item.item_name, "adding pantry item");
                    Effect::Request(Request::Add {
                        ticket: self.mutations.issue(),
                        item,
                    })
                }
                Err(ValidationError::EmptyItemName) => {
                    tracing::debug!("ignoring add with empty item name");
                    Effect::None
                }
                Err(error) => Effect::Notify(Notice::error("Invalid item", error.to_string())),
            },
            Message::Delete(id) => {
                tracing::info!(%id, "deleting pantry item");
                Effect::Request(Request::Delete {
                    ticket: self.mutations.issue(),
                    id,
                })
            }
            Message::Loaded(ticket, result) => {
                if !self.fetches.is_latest(ticket) {
                    tracing::debug!("discarding stale pantry list");
                    return Effect::None;
                }
                match result {
                    Ok(items) => {
                        tracing::debug!(count = items.len(), "pantry items received");
                        self.items = Load::Loaded(items);
                        Effect::None
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to fetch pantry items");
                        self.items = Load::Failed(error.to_string());
                        Effect::Notify(Notice::error("Pantry", "Could not load your pantry."))
                    }
                }
            }
            Message::Added(ticket, result) => {
                if !self.mutations.is_live(ticket) {
                    return Effect::None;
                }
                match result {
                    Ok(item) => {
                        tracing::info!(id = %item.id, "pantry item added, refreshing list");
                        self.name.clear();
                        self.expiry.clear();
                        self.fetch()
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to add pantry item");
                        Effect::Notify(Notice::error("Pantry", "Could not add the item."))
                    }
                }
            }
            Message::Deleted(ticket, id, result) => {
                if !self.mutations.is_live(ticket) {
                    return Effect::None;
                }
                match result {
                    Ok(()) => {
                        tracing::info!(%id, "pantry item deleted, refreshing list");
                        self.fetch()
                    }
                    Err(error) => {
                        tracing::warn!(%id, %error, "failed to delete pantry item");
                        Effect::Notify(Notice::error("Pantry", "Could not delete the item."))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let form = row![
            text_input("Add new pantry item", self.name())
                .on_input(Message::NameChanged)
                .on_submit(Message::Add)
                .padding(10),
            text_input("Expires (YYYY-MM-DD)", &self.expiry)
                .on_input(Message::ExpiryChanged)
                .on_submit(Message::Add)
                .padding(10)
                .width(Length::Fixed(200.0)),
            button("Add").on_press(Message::Add).padding(10),
            button("Refresh")
                .on_press(Message::Refresh)
                .style(button::secondary)
                .padding(10),
        ]
        .spacing(10);

        let list: Element<'_, Message> = if self.is_loading() {
            text("Loading pantry...").into()
        } else if self.items().is_empty() {
            text("Your pantry is empty.").into()
        } else {
            let rows = self.items().iter().map(|item| {
                let expiry = item
                    .expiry_date
                    .map(|date| format!("expires {}", date.format("%b %-d, %Y")))
                    .unwrap_or_default();
                row![
                    text(&item.item_name).size(16).width(Length::Fill),
                    text(expiry).size(13),
                    button("Delete")
                        .on_press(Message::Delete(item.id))
                        .style(button::danger),
                ]
                .spacing(12)
                .align_y(Alignment::Center)
                .into()
            });
            scrollable(Column::with_children(rows).spacing(8))
                .height(Length::Fill)
                .into()
        };

        column![form, list].spacing(20).padding(20).into()
    }
}

/// Perform a pantry request against the backend
pub async fn perform(api: Arc<dyn PlannerApi>, session: Session, request: Request) -> Message {
    match request {
        Request::Fetch { ticket } => Message::Loaded(ticket, api.pantry(&session).await),
        Request::Add { ticket, item } => {
            Message::Added(ticket, api.add_pantry_item(&session, &item).await)
        }
        Request::Delete { ticket, id } => {
            Message::Deleted(ticket, id, api.delete_pantry_item(id).await)
        }
    }
}
