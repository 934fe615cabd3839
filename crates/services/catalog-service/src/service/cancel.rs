//! Cancellation for handler calls.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use common::{AppError, AppResult};

/// Drive `fut` unless `cancel` fires first.
///
/// A cancelled call returns [`AppError::Cancelled`] and drops `fut`. A write
/// that was already sent to the backend may or may not have been applied.
pub async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    if cancel.is_cancelled() {
        return Err(AppError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_already_cancelled_returns_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = cancellable(&cancel, async { Ok::<_, AppError>(1) }).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_while_pending() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move { trigger.cancel() });

        let result: AppResult<()> = cancellable(&cancel, std::future::pending()).await;
        assert!(matches!(result, Err(AppError::Cancelled)));
    }

    #[tokio::test]
    async fn test_completes_normally() {
        let cancel = CancellationToken::new();
        let result = cancellable(&cancel, async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
