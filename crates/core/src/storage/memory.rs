//! In-memory storage back-ends for tests and hosts without a browser

use super::{CookieOptions, CookieStore, DurableStore};
use crate::error::CoreResult;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Durable store backed by a shared map; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryDurableStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableStore for MemoryDurableStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// A cookie as last written, attributes included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCookie {
    pub value: String,
    pub options: CookieOptions,
}

/// Cookie store backed by a shared map; clones see the same jar
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieStore {
    cookies: Arc<Mutex<HashMap<String, StoredCookie>>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a cookie together with the attributes it was written with
    pub fn cookie(&self, name: &str) -> Option<StoredCookie> {
        lock(&self.cookies).get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.cookies).is_empty()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        lock(&self.cookies).get(name).map(|c| c.value.clone())
    }

    fn put(&self, name: &str, value: &str, options: &CookieOptions) -> CoreResult<()> {
        lock(&self.cookies).insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                options: options.clone(),
            },
        );
        Ok(())
    }

    fn remove(&self, name: &str, _options: &CookieOptions) -> CoreResult<()> {
        lock(&self.cookies).remove(name);
        Ok(())
    }
}
