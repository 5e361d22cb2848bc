//! Cooperative cancellation helpers for handlers.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::{WorkforceError, WorkforceResult};

/// Fails fast when the request has already been cancelled.
///
/// # Errors
/// `Cancelled` if the token is cancelled.
pub fn ensure_active(cancel: &CancellationToken) -> WorkforceResult<()> {
    if cancel.is_cancelled() {
        Err(WorkforceError::Cancelled)
    } else {
        Ok(())
    }
}

/// Races a store call against the request's cancellation.
///
/// Dropping the losing future aborts the in-flight I/O.
///
/// # Errors
/// `Cancelled` if the token fires first; otherwise the call's own result.
pub async fn until_cancelled<F, T>(cancel: &CancellationToken, future: F) -> WorkforceResult<T>
where
    F: Future<Output = WorkforceResult<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(WorkforceError::Cancelled),
        result = future => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_completes_when_not_cancelled() {
        let cancel = CancellationToken::new();
        let value = until_cancelled(&cancel, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert!(ensure_active(&cancel).is_ok());
    }

    #[tokio::test]
    async fn test_cancellation_wins_over_pending_io() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let result: WorkforceResult<()> = until_cancelled(&cancel, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(WorkforceError::Cancelled)));
        assert!(matches!(ensure_active(&cancel), Err(WorkforceError::Cancelled)));
    }
}
