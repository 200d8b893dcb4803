use std::{collections::HashMap, fmt::Display, str::FromStr, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use shared::domain::{GroupKey, OrderKey};
use storage::Storage;
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const GROUP_BY_KEY: &str = "groupBy";
pub const ORDER_BY_KEY: &str = "orderBy";

#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load(&self, name: &str) -> Result<Option<String>>;
    async fn save(&self, name: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl PreferenceStore for Storage {
    async fn load(&self, name: &str) -> Result<Option<String>> {
        self.get_preference(name).await
    }

    async fn save(&self, name: &str, value: &str) -> Result<()> {
        self.set_preference(name, value).await
    }
}

#[async_trait]
impl<T> PreferenceStore for Arc<T>
where
    T: PreferenceStore + ?Sized,
{
    async fn load(&self, name: &str) -> Result<Option<String>> {
        (**self).load(name).await
    }

    async fn save(&self, name: &str, value: &str) -> Result<()> {
        (**self).save(name, value).await
    }
}

#[async_trait]
impl<T> PreferenceStore for Box<T>
where
    T: PreferenceStore + ?Sized,
{
    async fn load(&self, name: &str) -> Result<Option<String>> {
        (**self).load(name).await
    }

    async fn save(&self, name: &str, value: &str) -> Result<()> {
        (**self).save(name, value).await
    }
}

/// Process-local store; values are lost when the process exits.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().await.clone()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self, name: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(name).cloned())
    }

    async fn save(&self, name: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}

/// Grouping and ordering selection. The in-memory value is authoritative for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DisplaySettings {
    pub group_by: GroupKey,
    pub order_by: OrderKey,
}

impl DisplaySettings {
    pub fn new(group_by: GroupKey, order_by: OrderKey) -> Self {
        Self { group_by, order_by }
    }

    /// Reads both selections, falling back to defaults on absence or failure.
    pub async fn load<S>(store: &S) -> Self
    where
        S: PreferenceStore + ?Sized,
    {
        let defaults = Self::default();
        Self {
            group_by: load_or_default(store, GROUP_BY_KEY, defaults.group_by).await,
            order_by: load_or_default(store, ORDER_BY_KEY, defaults.order_by).await,
        }
    }

    /// Writes both selections. Failures are logged, never returned.
    pub async fn persist<S>(&self, store: &S)
    where
        S: PreferenceStore + ?Sized,
    {
        save_logged(store, GROUP_BY_KEY, self.group_by.as_str()).await;
        save_logged(store, ORDER_BY_KEY, self.order_by.as_str()).await;
    }
}

async fn load_or_default<S, T>(store: &S, name: &str, default: T) -> T
where
    S: PreferenceStore + ?Sized,
    T: FromStr + Copy,
    T::Err: Display,
{
    match store.load(name).await {
        Ok(Some(raw)) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    preference = name,
                    error = %err,
                    "stored preference is invalid; using default"
                );
                default
            }
        },
        Ok(None) => {
            debug!(preference = name, "no stored preference; using default");
            default
        }
        Err(err) => {
            warn!(preference = name, error = %err, "failed to load preference; using default");
            default
        }
    }
}

async fn save_logged<S>(store: &S, name: &str, value: &str)
where
    S: PreferenceStore + ?Sized,
{
    match store.save(name, value).await {
        Ok(()) => debug!(preference = name, value, "saved preference"),
        Err(err) => warn!(preference = name, error = %err, "failed to save preference"),
    }
}

#[cfg(test)]
#[path = "tests/preferences_tests.rs"]
mod tests;
