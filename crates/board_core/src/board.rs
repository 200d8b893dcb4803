use serde::Serialize;
use shared::domain::{GroupKey, GroupedView, OrderKey, Ticket, User, UserId};
use tracing::{debug, error, info};

use crate::{
    engine::{derive_view, resolve_user},
    loader::TicketSource,
    preferences::{DisplaySettings, PreferenceStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded { tickets: usize, users: usize },
    Failed(String),
}

/// Kanban board state: fetched tickets/users plus the display selection.
pub struct KanbanBoard<S, P> {
    source: S,
    store: P,
    tickets: Vec<Ticket>,
    users: Vec<User>,
    settings: DisplaySettings,
    load_state: LoadState,
    mounted: bool,
}

impl<S, P> KanbanBoard<S, P>
where
    S: TicketSource,
    P: PreferenceStore,
{
    pub fn new(source: S, store: P) -> Self {
        Self {
            source,
            store,
            tickets: Vec::new(),
            users: Vec::new(),
            settings: DisplaySettings::default(),
            load_state: LoadState::Pending,
            mounted: false,
        }
    }

    /// Restores the persisted selection and fetches tickets. Only the first call does anything.
    pub async fn mount(&mut self) {
        if self.mounted {
            debug!("board already mounted; skipping fetch");
            return;
        }
        self.mounted = true;

        self.settings = DisplaySettings::load(&self.store).await;
        debug!(
            group_by = %self.settings.group_by,
            order_by = %self.settings.order_by,
            "restored display settings"
        );

        match self.source.fetch().await {
            Ok(payload) => {
                info!(
                    tickets = payload.tickets.len(),
                    users = payload.users.len(),
                    "loaded board data"
                );
                self.load_state = LoadState::Loaded {
                    tickets: payload.tickets.len(),
                    users: payload.users.len(),
                };
                self.tickets = payload.tickets;
                self.users = payload.users;
            }
            Err(err) => {
                error!(error = %err, "error fetching tickets");
                self.load_state = LoadState::Failed(err.to_string());
            }
        }
    }

    pub async fn set_group_by(&mut self, group_by: GroupKey) {
        self.settings.group_by = group_by;
        self.settings.persist(&self.store).await;
    }

    pub async fn set_order_by(&mut self, order_by: OrderKey) {
        self.settings.order_by = order_by;
        self.settings.persist(&self.store).await;
    }

    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user_for(&self, ticket: &Ticket) -> Option<&User> {
        resolve_user(&self.users, ticket.user_id.as_ref())
    }

    /// Grouped and ordered columns, rebuilt from current state on each call.
    pub fn view(&self) -> GroupedView {
        derive_view(&self.tickets, &self.users, &self.settings)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            group_by: self.settings.group_by,
            order_by: self.settings.order_by,
            view: self.view(),
            users: self.users.clone(),
        }
    }
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub group_by: GroupKey,
    pub order_by: OrderKey,
    pub view: GroupedView,
    pub users: Vec<User>,
}

impl BoardSnapshot {
    pub fn user(&self, id: Option<&UserId>) -> Option<&User> {
        resolve_user(&self.users, id)
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
