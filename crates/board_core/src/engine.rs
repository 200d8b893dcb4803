//! Grouping and ordering of tickets into board columns.
//!
//! Everything here is a pure function of its inputs; the board recomputes the
//! view on every render.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
};

use shared::domain::{
    Column, GroupKey, GroupLabel, GroupedView, OrderKey, Ticket, User, UserId, UNKNOWN_USER,
};
use tracing::warn;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::preferences::DisplaySettings;

/// Status columns that are always present when grouping by status.
pub const STATUS_SENTINELS: [&str; 2] = ["done", "cancelled"];

#[derive(Default)]
struct ColumnBuilder {
    columns: Vec<Column>,
    index: HashMap<GroupLabel, usize>,
}

impl ColumnBuilder {
    fn column_mut(&mut self, label: GroupLabel) -> &mut Vec<Ticket> {
        let slot = match self.index.get(&label).copied() {
            Some(slot) => slot,
            None => {
                let slot = self.columns.len();
                self.index.insert(label.clone(), slot);
                self.columns.push(Column {
                    label,
                    tickets: Vec::new(),
                });
                slot
            }
        };
        &mut self.columns[slot].tickets
    }

    fn push(&mut self, label: GroupLabel, ticket: &Ticket) {
        self.column_mut(label).push(ticket.clone());
    }

    /// Adds an empty column unless one with this label already exists.
    fn ensure(&mut self, label: GroupLabel) {
        self.column_mut(label);
    }

    fn finish(self, key: GroupKey) -> GroupedView {
        GroupedView {
            group_by: Some(key),
            columns: self.columns,
        }
    }
}

pub fn group(tickets: &[Ticket], users: &[User], key: GroupKey) -> GroupedView {
    match key {
        GroupKey::Status => group_by_status(tickets),
        GroupKey::User => group_by_user(tickets, users),
        GroupKey::Priority => group_by_priority(tickets),
    }
}

/// Groups by a textual key name. Unknown names produce an empty view.
pub fn group_by_name(tickets: &[Ticket], users: &[User], key: &str) -> GroupedView {
    match key.parse::<GroupKey>() {
        Ok(key) => group(tickets, users, key),
        Err(err) => {
            warn!(error = %err, "ignoring unknown grouping");
            GroupedView::empty()
        }
    }
}

fn group_by_status(tickets: &[Ticket]) -> GroupedView {
    let mut builder = ColumnBuilder::default();
    for ticket in tickets {
        builder.push(GroupLabel::Status(ticket.status.clone()), ticket);
    }
    for sentinel in STATUS_SENTINELS {
        builder.ensure(GroupLabel::Status(sentinel.to_string()));
    }
    builder.finish(GroupKey::Status)
}

fn group_by_user(tickets: &[Ticket], users: &[User]) -> GroupedView {
    let mut names: HashMap<&UserId, &str> = HashMap::with_capacity(users.len());
    for user in users {
        // First entry wins, matching a front-to-back scan.
        names.entry(&user.id).or_insert(user.name.as_str());
    }

    let mut builder = ColumnBuilder::default();
    for ticket in tickets {
        let name = ticket
            .user_id
            .as_ref()
            .and_then(|id| names.get(id).copied())
            .unwrap_or(UNKNOWN_USER);
        builder.push(GroupLabel::User(name.to_string()), ticket);
    }
    builder.finish(GroupKey::User)
}

fn group_by_priority(tickets: &[Ticket]) -> GroupedView {
    let mut buckets: BTreeMap<i64, Vec<Ticket>> = BTreeMap::new();
    for ticket in tickets {
        buckets
            .entry(ticket.priority)
            .or_default()
            .push(ticket.clone());
    }

    GroupedView {
        group_by: Some(GroupKey::Priority),
        columns: buckets
            .into_iter()
            .map(|(priority, tickets)| Column {
                label: GroupLabel::Priority(priority),
                tickets,
            })
            .collect(),
    }
}

/// Sorts every column in place. The sort is stable, so equal keys keep input order.
pub fn sort(view: &mut GroupedView, order: OrderKey) {
    for column in &mut view.columns {
        match order {
            OrderKey::Priority => column
                .tickets
                .sort_by(|a, b| b.priority.cmp(&a.priority)),
            OrderKey::Title => column
                .tickets
                .sort_by(|a, b| compare_titles(&a.title, &b.title)),
        }
    }
}

/// Sorts by a textual order name. Unknown names leave the view untouched.
pub fn sort_by_name(view: &mut GroupedView, order: &str) {
    match order.parse::<OrderKey>() {
        Ok(order) => sort(view, order),
        Err(err) => warn!(error = %err, "ignoring unknown ordering"),
    }
}

/// Locale-style title comparison.
///
/// Accents and case are ignored first, so "Éclair" sorts between "Alpha" and "Zebra".
/// Remaining ties fall back to the lowercase form, then to lowercase-before-uppercase.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    fold_title(a)
        .cmp(&fold_title(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn fold_title(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn derive_view(tickets: &[Ticket], users: &[User], settings: &DisplaySettings) -> GroupedView {
    let mut view = group(tickets, users, settings.group_by);
    sort(&mut view, settings.order_by);
    view
}

/// Linear lookup of a ticket owner, as used for card avatars.
pub fn resolve_user<'a>(users: &'a [User], id: Option<&UserId>) -> Option<&'a User> {
    let id = id?;
    users.iter().find(|user| &user.id == id)
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
