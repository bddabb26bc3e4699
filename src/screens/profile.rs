//! Profile editor: household size plus dietary and health tags.
//!
//! Edits stay local until the user saves.

use std::collections::BTreeSet;
use std::sync::Arc;

use iced::widget::{button, column, text, text_input};
use iced::{Element, Length};
use iced_aw::Wrap;

use super::Effect;
use crate::api::PlannerApi;
use crate::error::ApiError;
use crate::state::data::UserProfile;
use crate::state::{Load, Notice, Session, Ticket, Tracker};

/// Used when the household size field does not start with a positive number
pub const DEFAULT_HOUSEHOLD_SIZE: u32 = 2;

/// A fixed vocabulary of profile tags
pub trait Tag: Copy + Ord + 'static {
    /// Every tag, in display order
    const ALL: &'static [Self];

    /// Label shown to the user and sent to the backend
    fn label(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Diet {
    Vegan,
    Vegetarian,
    GlutenFree,
}

impl Tag for Diet {
    const ALL: &'static [Self] = &[Diet::Vegan, Diet::Vegetarian, Diet::GlutenFree];

    fn label(self) -> &'static str {
        match self {
            Diet::Vegan => "Vegan",
            Diet::Vegetarian => "Vegetarian",
            Diet::GlutenFree => "Gluten-Free",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Goal {
    LowCarb,
    HighProtein,
    LowFat,
}

impl Tag for Goal {
    const ALL: &'static [Self] = &[Goal::LowCarb, Goal::HighProtein, Goal::LowFat];

    fn label(self) -> &'static str {
        match self {
            Goal::LowCarb => "Low-Carb",
            Goal::HighProtein => "High-Protein",
            Goal::LowFat => "Low-Fat",
        }
    }
}

/// Independent on/off toggles over one vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet<T: Tag> {
    selected: BTreeSet<T>,
}

impl<T: Tag> Default for TagSet<T> {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }
}

impl<T: Tag> TagSet<T> {
    pub fn toggle(&mut self, tag: T) {
        if !self.selected.remove(&tag) {
            self.selected.insert(tag);
        }
    }

    pub fn contains(&self, tag: T) -> bool {
        self.selected.contains(&tag)
    }

    /// Labels of the selected tags, in vocabulary order
    pub fn labels(&self) -> Vec<String> {
        T::ALL
            .iter()
            .filter(|tag| self.contains(**tag))
            .map(|tag| tag.label().to_string())
            .collect()
    }
}

/// Parse the household size field the lenient way: an optional `+` and
/// leading digits count, anything else (or zero) falls back to the default.
pub fn parse_household_size(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();

    match digits.parse::<u32>() {
        Ok(size) if size >= 1 => size,
        _ => DEFAULT_HOUSEHOLD_SIZE,
    }
}

#[derive(Debug)]
pub struct Profile {
    household_size: String,
    diets: TagSet<Diet>,
    goals: TagSet<Goal>,
    saved: Load<UserProfile>,
    tracker: Tracker,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            household_size: DEFAULT_HOUSEHOLD_SIZE.to_string(),
            diets: TagSet::default(),
            goals: TagSet::default(),
            saved: Load::Idle,
            tracker: Tracker::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    HouseholdChanged(String),
    ToggleDiet(Diet),
    ToggleGoal(Goal),
    Save,
    Saved(Ticket, Result<UserProfile, ApiError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Save { ticket: Ticket, profile: UserProfile },
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diets(&self) -> &TagSet<Diet> {
        &self.diets
    }

    pub fn goals(&self) -> &TagSet<Goal> {
        &self.goals
    }

    pub fn is_saving(&self) -> bool {
        self.saved.is_loading()
    }

    /// The payload a save would send right now
    pub fn payload(&self) -> UserProfile {
        UserProfile {
            household_size: parse_household_size(&self.household_size),
            dietary_restrictions: self.diets.labels(),
            health_goals: self.goals.labels(),
        }
    }

    pub fn update(&mut self, message: Message) -> Effect<Request> {
        match message {
            Message::HouseholdChanged(value) => {
                self.household_size = value;
                Effect::None
            }
            Message::ToggleDiet(diet) => {
                self.diets.toggle(diet);
                Effect::None
            }
            Message::ToggleGoal(goal) => {
                self.goals.toggle(goal);
                Effect::None
            }
            Message::Save => {
                let profile = self.payload();
                tracing::info!(
                    household_size = profile.household_size,
                    diets = ?profile.dietary_restrictions,
                    goals = ?profile.health_goals,
                    "saving profile"
                );
                self.saved = Load::Loading;
                Effect::Request(Request::Save {
                    ticket: self.tracker.issue(),
                    profile,
                })
            }
            Message::Saved(ticket, result) => {
                if !self.tracker.is_latest(ticket) {
                    return Effect::None;
                }
                match result {
                    Ok(profile) => {
                        self.saved = Load::Loaded(profile);
                        Effect::Notify(Notice::success("Profile", "Profile saved successfully!"))
                    }
                    Err(error) => {
                        tracing::warn!(%error, "failed to save profile");
                        self.saved = Load::Failed(error.to_string());
                        Effect::Notify(Notice::error("Profile", "Failed to save profile."))
                    }
                }
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut save = button("Save Profile").padding(10);
        if !self.is_saving() {
            save = save.on_press(Message::Save);
        }

        column![
            text("Household Size").size(16),
            text_input("2", &self.household_size)
                .on_input(Message::HouseholdChanged)
                .padding(10)
                .width(Length::Fixed(120.0)),
            text("Dietary Restrictions").size(16),
            chips(self.diets(), Message::ToggleDiet),
            text("Health Goals").size(16),
            chips(self.goals(), Message::ToggleGoal),
            save,
        ]
        .spacing(12)
        .padding(20)
        .into()
    }
}

/// One toggle button per tag, highlighted when selected
fn chips<'a, T: Tag>(set: &TagSet<T>, on_toggle: fn(T) -> Message) -> Element<'a, Message> {
    let buttons: Vec<Element<'a, Message>> = T::ALL
        .iter()
        .map(|&tag| {
            let style = if set.contains(tag) {
                button::primary
            } else {
                button::secondary
            };
            button(text(tag.label()))
                .on_press(on_toggle(tag))
                .style(style)
                .into()
        })
        .collect();

    Wrap::with_elements(buttons)
        .spacing(8.0)
        .line_spacing(8.0)
        .into()
}

/// Perform a profile request against the backend
pub async fn perform(api: Arc<dyn PlannerApi>, session: Session, request: Request) -> Message {
    match request {
        Request::Save { ticket, profile } => {
            Message::Saved(ticket, api.update_profile(&session, &profile).await)
        }
    }
}
