//! Screen controllers
//!
//! Each screen owns its view state and reacts to messages. A screen never
//! talks to the network itself: its `update` returns an [`Effect`], and the
//! shell performs any `Request` with the screen's `perform` function and feeds
//! the reply back in as another message.
//!
//! - `search.rs` - recipe search and results
//! - `pantry.rs` - pantry list with add/delete
//! - `profile.rs` - household size and taste tags
//! - `shopping_list.rs` - shopping list with local check marks
//! - `recipe.rs` - recipe detail page

pub mod pantry;
pub mod profile;
pub mod recipe;
pub mod search;
pub mod shopping_list;

use crate::state::data::RecipeId;
use crate::state::Notice;

/// What the shell should do after a screen handled a message
#[derive(Debug, Clone, PartialEq)]
pub enum Effect<R> {
    None,
    /// Issue one backend call
    Request(R),
    /// Show a blocking notification
    Notify(Notice),
    /// Push the detail page for a recipe
    OpenRecipe(RecipeId),
}

/// Drive a screen until it stops asking for requests, performing each one
/// against the given backend. Returns the last non-request effect.
#[cfg(test)]
pub(crate) async fn settle<M, R, Fut>(
    mut update: impl FnMut(M) -> Effect<R>,
    perform: impl Fn(R) -> Fut,
    message: M,
) -> Effect<R>
where
    Fut: std::future::Future<Output = M>,
{
    let mut effect = update(message);
    while let Effect::Request(request) = effect {
        let reply = perform(request).await;
        effect = update(reply);
    }
    effect
}
