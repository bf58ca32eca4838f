// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory reference store for reconciliation tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::{QuillError, Reference, ReferenceStore};

/// A remote library held in memory.
///
/// Created references receive keys `MOCK0001`, `MOCK0002`, ... and are
/// appended to the library, so a later `list` returns them.
pub struct MockReferenceStore {
    items: Mutex<Vec<Reference>>,
    unreachable: Option<String>,
    failing_titles: HashSet<String>,
    created: Mutex<Vec<Reference>>,
    updates: Mutex<Vec<(String, Reference)>>,
    next_key: AtomicUsize,
    list_calls: AtomicUsize,
}

impl MockReferenceStore {
    pub fn new(items: Vec<Reference>) -> Self {
        Self {
            items: Mutex::new(items),
            unreachable: None,
            failing_titles: HashSet::new(),
            created: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            next_key: AtomicUsize::new(1),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// A store whose every call fails as unreachable with `message`.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            unreachable: Some(message.into()),
            ..Self::empty()
        }
    }

    /// Make `create` fail for references with this exact title.
    pub fn fail_create_for(mut self, title: impl Into<String>) -> Self {
        self.failing_titles.insert(title.into());
        self
    }

    /// References successfully created, in call order.
    pub async fn created(&self) -> Vec<Reference> {
        self.created.lock().await.clone()
    }

    /// `(key, reference)` pairs passed to `update`, in call order.
    pub async fn updates(&self) -> Vec<(String, Reference)> {
        self.updates.lock().await.clone()
    }

    /// Current library contents.
    pub async fn items(&self) -> Vec<Reference> {
        self.items.lock().await.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), QuillError> {
        match &self.unreachable {
            Some(message) => Err(QuillError::RemoteStoreUnreachable {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReferenceStore for MockReferenceStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    async fn list(&self) -> Result<Vec<Reference>, QuillError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        Ok(self.items.lock().await.clone())
    }

    async fn create(&self, reference: &Reference) -> Result<String, QuillError> {
        self.check_reachable()?;
        if self.failing_titles.contains(&reference.title) {
            return Err(QuillError::remote_store(format!(
                "item rejected: {}",
                reference.title
            )));
        }

        let n = self.next_key.fetch_add(1, Ordering::SeqCst);
        let key = format!("MOCK{n:04}");
        let stored = reference.clone().with_external_key(key.clone());
        self.items.lock().await.push(stored.clone());
        self.created.lock().await.push(stored);
        Ok(key)
    }

    async fn update(&self, key: &str, reference: &Reference) -> Result<(), QuillError> {
        self.check_reachable()?;
        let mut items = self.items.lock().await;
        let slot = items
            .iter_mut()
            .find(|item| item.external_key.as_deref() == Some(key))
            .ok_or_else(|| QuillError::remote_store(format!("no item with key {key}")))?;
        *slot = reference.clone().with_external_key(key);
        self.updates
            .lock()
            .await
            .push((key.to_string(), reference.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_items_are_listed_with_keys() {
        let store = MockReferenceStore::empty();
        let key = store
            .create(&Reference::new("Paper", vec!["A. Author".into()], Some(2020)))
            .await
            .unwrap();
        assert_eq!(key, "MOCK0001");

        let items = store.list().await.unwrap();
        assert_eq!(items[0].external_key.as_deref(), Some("MOCK0001"));
    }

    #[tokio::test]
    async fn unreachable_store_fails_every_call() {
        let store = MockReferenceStore::unreachable("connection refused");
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, QuillError::RemoteStoreUnreachable { .. }));
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_key_fails() {
        let store = MockReferenceStore::empty();
        let result = store.update("NOPE", &Reference::default()).await;
        assert!(result.is_err());
    }
}
