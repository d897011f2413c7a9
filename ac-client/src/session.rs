//! Session state
//!
//! One session per running client. It is created empty, filled once by a
//! successful login and cleared entirely by logout.
//!
//! There is no global instance: construct a [`SharedSession`] once and hand
//! clones of it to whatever makes network calls.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Authenticated user's token, username and granted group names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    username: Option<String>,
    groups: BTreeSet<String>,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces token, username and groups together.
    pub fn login(
        &mut self,
        token: impl Into<String>,
        username: impl Into<String>,
        groups: impl IntoIterator<Item = String>,
    ) {
        *self = Self {
            token: Some(token.into()),
            username: Some(username.into()),
            groups: groups.into_iter().collect(),
        };
    }

    /// Clears everything. Groups become an empty set, never absent.
    pub fn logout(&mut self) {
        self.token = None;
        self.username = None;
        self.groups.clear();
    }

    /// Exact, case-sensitive membership test.
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains(name)
    }

    /// True iff a non-empty token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }
}

/// Cloneable handle to the client's single session.
///
/// Writers replace the whole value under one lock, so a reader never sees
/// a half-updated session.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        // Writes are single assignments; a poisoned lock still holds a whole Session.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn login(&self, token: impl Into<String>, username: impl Into<String>, groups: Vec<String>) {
        self.write().login(token, username, groups);
    }

    pub fn logout(&self) {
        self.write().logout();
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.read().has_group(name)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Current non-empty token, if any
    pub fn token(&self) -> Option<String> {
        self.read()
            .token()
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    pub fn username(&self) -> Option<String> {
        self.read().username().map(str::to_string)
    }

    /// Point-in-time copy
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }
}
