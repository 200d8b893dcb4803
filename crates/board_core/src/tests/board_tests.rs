use super::*;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::{domain::TicketId, protocol::BoardPayload};

use crate::{
    error::LoadError,
    loader::StaticTicketSource,
    preferences::{MemoryPreferenceStore, GROUP_BY_KEY, ORDER_BY_KEY},
};

struct CountingSource {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl TicketSource for CountingSource {
    async fn fetch(&self) -> Result<BoardPayload, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LoadError::Status {
                status: 500,
                url: "http://board.test/tickets".to_string(),
            });
        }
        Ok(payload())
    }
}

fn payload() -> BoardPayload {
    let ticket = |id: &str, title: &str, status: &str, priority: i64, user: &str| Ticket {
        id: TicketId::new(id),
        title: title.to_string(),
        tag: Vec::new(),
        user_id: Some(UserId::new(user)),
        status: status.to_string(),
        priority,
    };
    BoardPayload {
        tickets: vec![
            ticket("CAM-1", "Beta", "Todo", 1, "usr-1"),
            ticket("CAM-2", "alpha", "Todo", 4, "usr-2"),
            ticket("CAM-3", "Gamma", "Backlog", 2, "usr-1"),
        ],
        users: vec![User {
            id: UserId::new("usr-1"),
            name: "Ann".to_string(),
            avatar: Some("https://avatars.test/ann.png".to_string()),
            available: true,
        }],
    }
}

fn ids(tickets: &[Ticket]) -> Vec<&str> {
    tickets.iter().map(|t| t.id.as_str()).collect()
}

#[tokio::test]
async fn board_starts_pending_and_empty() {
    let board = KanbanBoard::new(StaticTicketSource::new(payload()), MemoryPreferenceStore::new());
    assert_eq!(board.load_state(), &LoadState::Pending);
    assert!(board.tickets().is_empty());
    assert_eq!(board.view().labels(), vec!["done", "cancelled"]);
}

#[tokio::test]
async fn mount_loads_data_and_default_view() {
    let mut board = KanbanBoard::new(
        StaticTicketSource::new(payload()),
        MemoryPreferenceStore::new(),
    );
    board.mount().await;

    assert_eq!(board.load_state(), &LoadState::Loaded { tickets: 3, users: 1 });
    assert_eq!(board.settings(), DisplaySettings::default());

    let view = board.view();
    assert_eq!(view.labels(), vec!["Todo", "Backlog", "done", "cancelled"]);
    assert_eq!(ids(view.get("Todo").expect("todo")), vec!["CAM-2", "CAM-1"]);
}

#[tokio::test]
async fn mount_fetches_only_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        calls: calls.clone(),
        fail: false,
    };
    let mut board = KanbanBoard::new(source, MemoryPreferenceStore::new());
    board.mount().await;
    board.mount().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(board.tickets().len(), 3);
}

#[tokio::test]
async fn fetch_failure_keeps_empty_state() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = CountingSource {
        calls: calls.clone(),
        fail: true,
    };
    let mut board = KanbanBoard::new(source, MemoryPreferenceStore::new());
    board.mount().await;

    assert!(matches!(board.load_state(), LoadState::Failed(message) if message.contains("500")));
    assert!(board.tickets().is_empty());
    assert!(board.users().is_empty());
    assert_eq!(board.view().ticket_count(), 0);

    board.mount().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn mount_restores_persisted_selection() {
    let store = MemoryPreferenceStore::with_values([
        (GROUP_BY_KEY, "user"),
        (ORDER_BY_KEY, "title"),
    ]);
    let mut board = KanbanBoard::new(StaticTicketSource::new(payload()), store);
    board.mount().await;

    assert_eq!(board.settings(), DisplaySettings::new(GroupKey::User, OrderKey::Title));
    let view = board.view();
    assert_eq!(view.labels(), vec!["Ann", "Unknown"]);
    assert_eq!(ids(view.get("Ann").expect("Ann")), vec!["CAM-1", "CAM-3"]);
}

#[tokio::test]
async fn selection_changes_are_persisted_and_reflected() {
    let store = Arc::new(MemoryPreferenceStore::new());
    let mut board = KanbanBoard::new(StaticTicketSource::new(payload()), store.clone());
    board.mount().await;

    board.set_group_by(GroupKey::Priority).await;
    assert_eq!(board.view().labels(), vec!["1", "2", "4"]);
    assert_eq!(
        store.snapshot().await.get(GROUP_BY_KEY).map(String::as_str),
        Some("priority")
    );

    board.set_order_by(OrderKey::Title).await;
    let values = store.snapshot().await;
    assert_eq!(values.get(ORDER_BY_KEY).map(String::as_str), Some("title"));
    assert_eq!(values.get(GROUP_BY_KEY).map(String::as_str), Some("priority"));

    let mut reopened = KanbanBoard::new(StaticTicketSource::new(payload()), store.clone());
    reopened.mount().await;
    assert_eq!(reopened.settings(), DisplaySettings::new(GroupKey::Priority, OrderKey::Title));
}

#[tokio::test]
async fn snapshot_exposes_selection_and_owner_lookup() {
    let mut board = KanbanBoard::new(
        StaticTicketSource::new(payload()),
        MemoryPreferenceStore::new(),
    );
    board.mount().await;
    board.set_order_by(OrderKey::Title).await;

    let snapshot = board.snapshot();
    assert_eq!(snapshot.group_by, GroupKey::Status);
    assert_eq!(snapshot.order_by, OrderKey::Title);
    assert_eq!(ids(snapshot.view.get("Todo").expect("todo")), vec!["CAM-2", "CAM-1"]);

    let first = &board.tickets()[0];
    assert_eq!(board.user_for(first).map(|u| u.name.as_str()), Some("Ann"));
    assert_eq!(
        snapshot.user(first.user_id.as_ref()).and_then(|u| u.avatar.as_deref()),
        Some("https://avatars.test/ann.png")
    );
    assert!(board.user_for(&board.tickets()[1]).is_none());

    let json = serde_json::to_value(&snapshot).expect("json");
    assert_eq!(json["group_by"], "status");
    assert_eq!(json["view"]["columns"][0]["label"], "Todo");
}
