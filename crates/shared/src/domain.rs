use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::KeyParseError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(TicketId);
id_newtype!(UserId);

/// Label used for tickets whose owner cannot be resolved.
pub const UNKNOWN_USER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    #[serde(default)]
    pub tag: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    #[default]
    Status,
    User,
    Priority,
}

impl GroupKey {
    pub const ALL: [GroupKey; 3] = [GroupKey::Status, GroupKey::User, GroupKey::Priority];

    pub fn as_str(self) -> &'static str {
        match self {
            GroupKey::Status => "status",
            GroupKey::User => "user",
            GroupKey::Priority => "priority",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" => Ok(GroupKey::Status),
            "user" => Ok(GroupKey::User),
            "priority" => Ok(GroupKey::Priority),
            other => Err(KeyParseError::UnknownGroupKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    #[default]
    Priority,
    Title,
}

impl OrderKey {
    pub const ALL: [OrderKey; 2] = [OrderKey::Priority, OrderKey::Title];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderKey::Priority => "priority",
            OrderKey::Title => "title",
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "priority" => Ok(OrderKey::Priority),
            "title" => Ok(OrderKey::Title),
            other => Err(KeyParseError::UnknownOrderKey(other.to_string())),
        }
    }
}

/// Column label, typed by the grouping dimension that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupLabel {
    Status(String),
    /// Resolved user name, or [`UNKNOWN_USER`].
    User(String),
    Priority(i64),
}

impl GroupLabel {
    pub fn key(&self) -> GroupKey {
        match self {
            GroupLabel::Status(_) => GroupKey::Status,
            GroupLabel::User(_) => GroupKey::User,
            GroupLabel::Priority(_) => GroupKey::Priority,
        }
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupLabel::Status(status) => f.write_str(status),
            GroupLabel::User(name) => f.write_str(name),
            GroupLabel::Priority(priority) => write!(f, "{priority}"),
        }
    }
}

impl Serialize for GroupLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub label: GroupLabel,
    pub tickets: Vec<Ticket>,
}

/// Ordered label -> tickets mapping handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedView {
    pub group_by: Option<GroupKey>,
    pub columns: Vec<Column>,
}

impl GroupedView {
    pub fn empty() -> Self {
        Self {
            group_by: None,
            columns: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.to_string()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&[Ticket]> {
        self.columns
            .iter()
            .find(|c| c.label.to_string() == label)
            .map(|c| c.tickets.as_slice())
    }

    pub fn ticket_count(&self) -> usize {
        self.columns.iter().map(|c| c.tickets.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}
