use super::data::UserId;
use crate::config::Config;

/// Who the requests are made for.
///
/// There is no login flow yet: the user id comes from configuration and is
/// handed to every screen and request instead of living in a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(UserId(config.user_id))
    }
}
