//! Shopping list.
//!
//! Refetched every time the tab regains focus. Check marks are local only and
//! keyed by item name; a refocus starts every item unchecked again.

use std::collections::HashSet;
use std::sync::Arc;

use iced::widget::{button, checkbox, column, container, row, scrollable, text, Column};
use iced::{Element, Length};

use super::Effect;
use crate::api::PlannerApi;
use crate::error::ApiError;
use crate::state::data::ShoppingListItem;
use crate::state::{Load, Notice, Session, Ticket, Tracker};

#[derive(Debug, Default)]
pub struct ShoppingList {
    items: Load<Vec<ShoppingListItem>>,
    /// Names of checked items
    checked: HashSet<String>,
    tracker: Tracker,
}

#[derive(Debug, Clone)]
pub enum Message {
    Focused,
    Refresh,
    Toggle(String),
    Clear,
    Loaded(Ticket, Result<Vec<ShoppingListItem>, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Fetch { ticket: Ticket },
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        self.items.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_loading(&self) -> bool {
        self.items.is_loading()
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.checked.contains(name)
    }

    fn fetch(&mut self) -> Effect<Request> {
        self.items = Load::Loading;
        Effect::Request(Request::Fetch {
            ticket: self.tracker.issue(),
        })
    }

    pub fn update(&mut self, message: Message) -> Effect<Request> {
        match message {
            Message::Focused => {
                self.checked.clear();
                self.fetch()
            }
            Message::Refresh => self.fetch(),
            Message::Toggle(name) => {
                if !self.checked.remove(&name) {
                    self.checked.insert(name);
                }
                Effect::None
            }
            Message::Clear => {
                // Local only, the backend list is untouched
                self.items = Load::Loaded(Vec::new());
                self.checked.clear();
                Effect::None
            }
            Message::Loaded(ticket, result) => {
                if !self.tracker.is_latest(ticket) {
                    tracing::debug!("discarding stale shopping list");
                    return Effect::None;
                }
                match result {
                    Ok(items) => {
                        tracing::debug!(count = items.len(), "shopping list received");
                        self.items = Load::Loaded(items);
                        Effect::None
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to fetch shopping list");
                        self.items = Load::Failed(error.to_string());
                        Effect::Notify(Notice::error(
                            "Shopping List",
                            "Could not load your shopping list.",
                        ))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = row![
            text("My Shopping List").size(24).width(Length::Fill),
            button("Refresh")
                .on_press(Message::Refresh)
                .style(button::secondary),
            button("Clear").on_press(Message::Clear).style(button::danger),
        ]
        .spacing(10);

        let list: Element<'_, Message> = if self.is_loading() {
            text("Loading shopping list...").into()
        } else if self.items().is_empty() {
            text("Your shopping list is empty. Add items from a recipe!").into()
        } else {
            let rows = self.items().iter().map(|item| self.item_row(item));
            scrollable(Column::with_children(rows).spacing(8))
                .height(Length::Fill)
                .into()
        };

        column![header, list].spacing(20).padding(20).into()
    }

    fn item_row<'a>(&'a self, item: &'a ShoppingListItem) -> Element<'a, Message> {
        let name = item.name.clone();
        let entry = checkbox(&item.name, self.is_checked(&item.name))
            .on_toggle(move |_| Message::Toggle(name.clone()));

        let mut card = column![entry].spacing(6);
        if let Some(substitution) = &item.substitution {
            card = card.push(
                text(format!(
                    "Save ${} by switching to: {}",
                    substitution.savings, substitution.name
                ))
                .size(13)
                .style(text::success),
            );
        }

        container(card)
            .padding(10)
            .width(Length::Fill)
            .style(container::rounded_box)
            .into()
    }
}

/// Perform a shopping list request against the backend
pub async fn perform(api: Arc<dyn PlannerApi>, session: Session, request: Request) -> Message {
    match request {
        Request::Fetch { ticket } => Message::Loaded(ticket, api.shopping_list(&session).await),
    }
}
