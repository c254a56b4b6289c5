//! Optimistic Updates
//!
//! Apply a local mutation, try to commit it remotely, undo it if the commit
//! fails. The one compensating action in the app.

use std::future::Future;

/// Run `apply`, then `commit`; on `Err` run `revert` and hand the error back
pub async fn optimistic<T, E, Fut>(
    apply: impl FnOnce(),
    commit: impl FnOnce() -> Fut,
    revert: impl FnOnce(),
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    apply();
    let result = commit().await;
    if result.is_err() {
        revert();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_success_keeps_mutation() {
        let value = Cell::new(1);
        let result: Result<u8, ()> = optimistic(|| value.set(2), || async { Ok(7) }, || value.set(1)).await;
        assert_eq!(result, Ok(7));
        assert_eq!(value.get(), 2);
    }

    #[tokio::test]
    async fn test_failure_reverts_mutation() {
        let value = Cell::new(1);
        let result: Result<(), &str> =
            optimistic(|| value.set(2), || async { Err("nope") }, || value.set(1)).await;
        assert_eq!(result, Err("nope"));
        assert_eq!(value.get(), 1);
    }

    #[tokio::test]
    async fn test_commit_sees_applied_state() {
        let value = Cell::new(false);
        let seen = Cell::new(false);
        let _: Result<(), ()> = optimistic(
            || value.set(true),
            || {
                seen.set(value.get());
                async { Ok(()) }
            },
            || value.set(false),
        )
        .await;
        assert!(seen.get());
    }
}
