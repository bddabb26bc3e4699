//! Tabs, routes and the recipe detail stack.
//!
//! Tab screens live for the whole session; switching tabs only changes which
//! one is drawn. Recipe pages are pushed on top of the active tab and popped
//! by `back` or by switching tabs.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::RouteError;
use crate::state::data::RecipeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Search,
    Pantry,
    Profile,
    ShoppingList,
}

impl Tab {
    /// Tab bar order
    pub const ALL: [Tab; 4] = [Tab::Search, Tab::Pantry, Tab::Profile, Tab::ShoppingList];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Search => "Meal Planner",
            Tab::Pantry => "Digital Pantry",
            Tab::Profile => "My Profile",
            Tab::ShoppingList => "Shopping List",
        }
    }

    fn route_name(self) -> &'static str {
        match self {
            Tab::Search => "index",
            Tab::Pantry => "pantry",
            Tab::Profile => "profile",
            Tab::ShoppingList => "shoppinglist",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Tab(Tab),
    Recipe(RecipeId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Tab(tab) => f.write_str(tab.route_name()),
            Route::Recipe(id) => write!(f, "recipe/{}", id),
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().trim_matches('/');

        if let Some(id) = path.strip_prefix("recipe/") {
            return id
                .parse()
                .map(|id| Route::Recipe(RecipeId(id)))
                .map_err(|_| RouteError::InvalidRecipeId(id.to_string()));
        }

        match path {
            "" | "index" => Ok(Route::Tab(Tab::Search)),
            other => Tab::ALL
                .into_iter()
                .find(|tab| tab.route_name() == other)
                .map(Route::Tab)
                .ok_or_else(|| RouteError::Unknown(s.to_string())),
        }
    }
}

/// A tab came (back) into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub tab: Tab,
    /// First time this tab is shown in the session
    pub first_visit: bool,
}

#[derive(Debug)]
pub struct Navigator {
    active: Tab,
    stack: Vec<RecipeId>,
    visited: HashSet<Tab>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on the search tab
    pub fn new() -> Self {
        Self {
            active: Tab::Search,
            stack: Vec::new(),
            visited: HashSet::from([Tab::Search]),
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    /// Number of recipe pages on top of the active tab
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current(&self) -> Route {
        match self.stack.last() {
            Some(id) => Route::Recipe(*id),
            None => Route::Tab(self.active),
        }
    }

    /// Switch to `tab`, dropping any recipe pages. Returns the focus change,
    /// or `None` when `tab` was already showing.
    pub fn select_tab(&mut self, tab: Tab) -> Option<Focus> {
        if tab == self.active && self.stack.is_empty() {
            return None;
        }
        self.stack.clear();
        self.active = tab;
        let first_visit = self.visited.insert(tab);
        tracing::debug!(route = %self.current(), first_visit, "tab selected");
        Some(Focus { tab, first_visit })
    }

    pub fn push_recipe(&mut self, id: RecipeId) {
        self.stack.push(id);
        tracing::debug!(route = %self.current(), depth = self.stack.len(), "recipe pushed");
    }

    /// Pop the top recipe page. Returns the focus change if that uncovered
    /// the tab itself.
    pub fn back(&mut self) -> Option<Focus> {
        self.stack.pop()?;
        if self.stack.is_empty() {
            Some(Focus {
                tab: self.active,
                first_visit: false,
            })
        } else {
            None
        }
    }
}
