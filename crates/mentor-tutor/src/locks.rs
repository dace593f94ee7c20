//! Per-user write locks

use mentor_types::UserId;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

/// How read-modify-write of a stored context is protected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteDiscipline {
    /// Load, update and save without a lock. Two concurrent updates for the
    /// same user can race and the later save silently drops the earlier one.
    BestEffort,
    /// One read-modify-write at a time per user within this process
    #[default]
    Serialized,
}

type LockMap = HashMap<UserId, Arc<tokio::sync::Mutex<()>>>;

/// Registry of one async mutex per user id. An entry lives only while a
/// guard or a waiter holds it.
#[derive(Default)]
pub(crate) struct UserLocks {
    locks: Arc<Mutex<LockMap>>,
}

impl UserLocks {
    pub(crate) async fn acquire(&self, user: &UserId) -> UserGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(user.clone()).or_default())
        };
        UserGuard {
            guard: Some(lock.lock_owned().await),
            user: user.clone(),
            locks: Arc::clone(&self.locks),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Held write lock for one user
pub(crate) struct UserGuard {
    guard: Option<OwnedMutexGuard<()>>,
    user: UserId,
    locks: Arc<Mutex<LockMap>>,
}

impl Drop for UserGuard {
    fn drop(&mut self) {
        // Waiters clone the Arc under the map lock, so a count of one here
        // means nobody else can reach this mutex.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(self.guard.take());
        if locks
            .get(&self.user)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_waits() {
        let locks = UserLocks::default();
        let user = UserId::new("alice");

        let guard = locks.acquire(&user).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&user)).await;
        assert!(second.is_err());

        drop(guard);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&user)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_released_entries_are_dropped() {
        let locks = UserLocks::default();
        for i in 0..100 {
            let guard = locks.acquire(&UserId::new(format!("user-{i}"))).await;
            assert_eq!(locks.len(), 1);
            drop(guard);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_entry_survives_while_someone_waits() {
        let locks = Arc::new(UserLocks::default());
        let user = UserId::new("alice");

        let first = locks.acquire(&user).await;
        let waiter = {
            let locks = Arc::clone(&locks);
            let user = user.clone();
            tokio::spawn(async move {
                let _second = locks.acquire(&user).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let locks = UserLocks::default();
        let _alice = locks.acquire(&UserId::new("alice")).await;
        let bob = tokio::time::timeout(
            Duration::from_millis(50),
            locks.acquire(&UserId::new("bob")),
        )
        .await;
        assert!(bob.is_ok());
    }
}
