use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use bitflags::bitflags;

use crate::{
    db::{self, JsonStore},
    dto::Callback,
    errors::MyError,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const MODERATE_EVENTS = 1;
        const MODERATE_ACHIEVEMENTS = 1 << 1;
        const PROMOTE_ADMINS = 1 << 2;
        const EXPORT = 1 << 3;
    }
}

impl Capabilities {
    /// What an admin callback needs. Plain student callbacks need nothing.
    pub fn required_for(callback: &Callback) -> Capabilities {
        match callback {
            Callback::ApproveEvents
            | Callback::ReviewEvent(_)
            | Callback::ConfirmEvent(_)
            | Callback::DenyEvent(_)
            | Callback::EditEvents
            | Callback::ViewEvent(_)
            | Callback::EditEvent(_)
            | Callback::DeleteEvent(_) => Capabilities::MODERATE_EVENTS,
            Callback::ApproveAchievements
            | Callback::ReviewAchievement(..)
            | Callback::ConfirmAchievement(..)
            | Callback::DenyAchievement(..) => Capabilities::MODERATE_ACHIEVEMENTS,
            Callback::ViewStudents(_) | Callback::SelectStudent(..) | Callback::ConfirmAddAdmin(_) => {
                Capabilities::PROMOTE_ADMINS
            }
            Callback::ExportEventData | Callback::ExportUsers => Capabilities::EXPORT,
            _ => Capabilities::empty(),
        }
    }
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn capabilities(&self, telegram_id: i64) -> Capabilities;

    async fn is_admin(&self, telegram_id: i64) -> bool {
        !self.capabilities(telegram_id).await.is_empty()
    }

    /// `Unauthorized` unless the user holds every capability in `required`.
    /// An empty `required` still asks for admin status.
    async fn check(&self, telegram_id: i64, required: Capabilities) -> Result<(), MyError> {
        let granted = self.capabilities(telegram_id).await;
        if granted.is_empty() || !granted.contains(required) {
            return Err(MyError::Unauthorized);
        }
        Ok(())
    }
}

/// Admins are the store's `admins` collection plus ids from configuration.
pub struct AdminRoster {
    store: Arc<JsonStore>,
    bootstrap: HashSet<i64>,
}

impl AdminRoster {
    pub fn new(store: Arc<JsonStore>, bootstrap: impl IntoIterator<Item = i64>) -> Self {
        Self {
            store,
            bootstrap: bootstrap.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Authorizer for AdminRoster {
    async fn capabilities(&self, telegram_id: i64) -> Capabilities {
        if self.bootstrap.contains(&telegram_id) || db::admin::exists(telegram_id, &self.store).await {
            Capabilities::all()
        } else {
            Capabilities::empty()
        }
    }
}
