// SPDX-License-Identifier: MIT

//! Short-lived store for create-ride drafts suspended on the free-text
//! location modal.
//!
//! Keyed by (user id, originating interaction id) so concurrent users never
//! see each other's pending data, with a TTL so an abandoned modal produces
//! a clear "session expired" error instead of stale state.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::error::{AppError, Result};
use crate::models::RideDraft;

const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Concurrent draft-session store.
pub struct DraftSessions {
    inner: DashMap<String, (RideDraft, Instant)>,
    ttl: Duration,
}

impl Default for DraftSessions {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }
}

impl DraftSessions {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: DashMap::new(),
            ttl,
        }
    }

    /// Session key for a draft: the user plus the interaction that opened
    /// the modal.
    pub fn key(user_id: u64, interaction_id: u64) -> String {
        format!("{user_id}:{interaction_id}")
    }

    /// Stash a draft awaiting the location modal submission.
    pub fn put(&self, key: String, draft: RideDraft) {
        // Opportunistic sweep so abandoned drafts do not accumulate.
        self.inner
            .retain(|_, (_, stored_at)| stored_at.elapsed() < self.ttl);
        self.inner.insert(key, (draft, Instant::now()));
    }

    /// Take a pending draft, consuming it. Missing or expired sessions fail
    /// with a user-facing error.
    pub fn take(&self, key: &str) -> Result<RideDraft> {
        let expired = || {
            AppError::InvalidValue(
                "Session expired. Please try creating the ride again.".to_string(),
            )
        };

        let (_, (draft, stored_at)) = self.inner.remove(key).ok_or_else(expired)?;
        if stored_at.elapsed() >= self.ttl {
            return Err(expired());
        }
        Ok(draft)
    }
}
