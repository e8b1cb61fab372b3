//! Caller-driven cancellation for collection calls.
//!
//! Both helpers drop the inner future when they give up, which cancels the
//! backend call and rolls back any transaction it held open.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{DataError, ErrorKind};

/// Resolve to `Cancelled` as soon as `token` fires, otherwise to `fut`.
pub async fn with_cancel<F, T>(token: &CancellationToken, fut: F) -> Result<T, DataError>
where
    F: Future<Output = Result<T, DataError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("operation cancelled by token");
            Err(ErrorKind::Cancelled.into())
        }
        res = fut => res,
    }
}

/// Resolve to `Cancelled` if `fut` does not finish within `deadline`.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> Result<T, DataError>
where
    F: Future<Output = Result<T, DataError>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(res) => res,
        Err(elapsed) => {
            tracing::debug!(?deadline, "operation deadline elapsed");
            Err(DataError::with_source(ErrorKind::Cancelled, elapsed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_result_through() {
        let token = CancellationToken::new();
        let v = with_cancel(&token, async { Ok::<_, DataError>(7) }).await.unwrap();
        assert_eq!(v, 7);

        let err = with_deadline(Duration::from_secs(5), async {
            Err::<(), _>(DataError::not_found())
        })
        .await
        .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn cancelled_token_wins() {
        let token = CancellationToken::new();
        token.cancel();
        let err = with_cancel(&token, std::future::pending::<Result<(), DataError>>())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_elapses() {
        let err = with_deadline(
            Duration::from_millis(50),
            std::future::pending::<Result<(), DataError>>(),
        )
        .await
        .unwrap_err();
        assert!(err.is(ErrorKind::Cancelled));
    }
}
