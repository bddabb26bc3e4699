//! Shell widgets shared by every screen
//!
//! - `tabs.rs` - persistent tab bar
//! - `notice.rs` - queued notices shown as a blocking dialog

pub mod notice;
pub mod tabs;
