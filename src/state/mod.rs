//! State management module
//!
//! This module holds everything screens share:
//! - Backend data mirrors (data.rs)
//! - Request state and stale-reply tracking (load.rs)
//! - User notifications (notice.rs)
//! - The session the requests are made for (session.rs)

pub mod data;
pub mod load;
pub mod notice;
pub mod session;

pub use load::{Load, Ticket, Tracker};
pub use notice::Notice;
pub use session::Session;
