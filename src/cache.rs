//! An in-process TTL cache for frequently read rows.
//!
//! Account and profile lookups happen on every transaction request, so the
//! read endpoints keep the deserialized rows around for a short while. The
//! ledger never touches this cache directly: it emits a
//! [crate::LedgerEvent] and the invalidation worker drops the stale entries.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crate::{account::Account, user::User};

/// How long a cached account row stays valid.
pub const ACCOUNT_TTL: Duration = Duration::from_secs(5 * 60);

/// How long a cached user profile stays valid.
pub const USER_PROFILE_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Account(i64),
    UserProfile(i64),
}

#[derive(Debug, Clone)]
enum CachedValue {
    Account(Account),
    UserProfile(User),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    expires_at: Instant,
    value: CachedValue,
}

/// A shared cache of read views, keyed by account or user ID.
///
/// A poisoned lock is treated as a cache miss, the next write replaces the
/// entry.
#[derive(Debug, Clone, Default)]
pub struct ReadCache {
    entries: Arc<Mutex<HashMap<CacheKey, CacheEntry>>>,
}

impl ReadCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &CacheKey) -> Option<CachedValue> {
        let mut entries = self.entries.lock().ok()?;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: CacheKey, value: CachedValue, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key,
                CacheEntry {
                    expires_at: Instant::now() + ttl,
                    value,
                },
            );
        }
    }

    fn remove(&self, key: &CacheKey) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    /// Look up a cached account row.
    pub fn get_account(&self, account_id: i64) -> Option<Account> {
        match self.get(&CacheKey::Account(account_id)) {
            Some(CachedValue::Account(account)) => Some(account),
            _ => None,
        }
    }

    /// Cache an account row for [ACCOUNT_TTL].
    pub fn put_account(&self, account: Account) {
        self.put(
            CacheKey::Account(account.id),
            CachedValue::Account(account),
            ACCOUNT_TTL,
        );
    }

    /// Drop the cached row for `account_id`, if any.
    pub fn invalidate_account(&self, account_id: i64) {
        self.remove(&CacheKey::Account(account_id));
    }

    /// Look up a cached user profile.
    pub fn get_user_profile(&self, user_id: i64) -> Option<User> {
        match self.get(&CacheKey::UserProfile(user_id)) {
            Some(CachedValue::UserProfile(user)) => Some(user),
            _ => None,
        }
    }

    /// Cache a user profile for [USER_PROFILE_TTL].
    pub fn put_user_profile(&self, user: User) {
        self.put(
            CacheKey::UserProfile(user.id),
            CachedValue::UserProfile(user),
            USER_PROFILE_TTL,
        );
    }

    /// Drop the cached profile for `user_id`, if any.
    pub fn invalidate_user_profile(&self, user_id: i64) {
        self.remove(&CacheKey::UserProfile(user_id));
    }
}
