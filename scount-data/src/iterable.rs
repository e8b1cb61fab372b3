//! Single-use lazy reader over the rows of a `find`.
//!
//! The producer (usually a database cursor inside a transaction) and the
//! consumer callback are polled together on the caller's task and linked by a
//! channel of capacity one, so rows are pulled only as fast as they are
//! consumed. Nothing is spawned.

use std::fmt;
use std::mem;

use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use crate::error::DataError;
use crate::page::{Page, Paging};

type Producer<T> = Box<dyn FnOnce(Yielder<T>) -> BoxFuture<'static, Result<u64, DataError>> + Send>;

/// Handle a producer pushes rows through.
pub struct Yielder<T> {
    tx: mpsc::Sender<T>,
}

impl<T: Send> Yielder<T> {
    /// Hand one row to the consumer. Returns `false` once the consumer has
    /// stopped; the producer should then stop pulling rows.
    pub async fn send(&self, item: T) -> bool {
        self.tx.send(item).await.is_ok()
    }
}

enum State<T> {
    NotStarted(Producer<T>),
    InProgress,
    Consumed { total: u64, failed: bool },
}

/// Lazily produced sequence of `T`, consumable exactly once.
///
/// After consumption, [`Iterable::total`] reports the number of rows matching
/// the filter regardless of paging or of the consumer stopping early.
pub struct Iterable<T> {
    state: State<T>,
}

impl<T: Send + 'static> Iterable<T> {
    /// Wrap a producer. It receives a [`Yielder`] and resolves to the total
    /// row count.
    pub fn new<F>(producer: F) -> Self
    where
        F: FnOnce(Yielder<T>) -> BoxFuture<'static, Result<u64, DataError>> + Send + 'static,
    {
        Self {
            state: State::NotStarted(Box::new(producer)),
        }
    }

    /// An iterable over already materialised rows; the total is their count.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(move |yielder| {
            Box::pin(async move {
                let total = items.len() as u64;
                for item in items {
                    if !yielder.send(item).await {
                        break;
                    }
                }
                Ok(total)
            })
        })
    }

    /// Feed every produced row to `f` until it returns `false` or the
    /// producer is exhausted.
    ///
    /// Fails with [`DataError::AlreadyConsumed`] on a second call, or with
    /// the producer's error.
    pub async fn for_each<F>(&mut self, mut f: F) -> Result<(), DataError>
    where
        F: FnMut(T) -> bool,
    {
        let producer = match mem::replace(&mut self.state, State::InProgress) {
            State::NotStarted(producer) => producer,
            other => {
                self.state = other;
                return Err(DataError::AlreadyConsumed);
            }
        };

        let (tx, mut rx) = mpsc::channel(1);
        let produce = producer(Yielder { tx });
        let consume = async move {
            while let Some(item) = rx.recv().await {
                if !f(item) {
                    break;
                }
            }
        };
        let (result, ()) = tokio::join!(produce, consume);

        match result {
            Ok(total) => {
                self.state = State::Consumed {
                    total,
                    failed: false,
                };
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "iterable producer failed");
                self.state = State::Consumed {
                    total: 0,
                    failed: true,
                };
                Err(err)
            }
        }
    }

    /// Drain every row into a `Vec`.
    pub async fn try_collect(&mut self) -> Result<Vec<T>, DataError> {
        let mut out = Vec::new();
        self.for_each(|item| {
            out.push(item);
            true
        })
        .await?;
        Ok(out)
    }

    /// Drain into a [`Page`] described by the same `paging` the find used.
    pub async fn into_page(mut self, paging: Option<Paging>) -> Result<Page<T>, DataError> {
        let content = self.try_collect().await?;
        Ok(Page::new(content, paging, self.total()))
    }
}

impl<T> Iterable<T> {
    pub fn is_consumed(&self) -> bool {
        matches!(self.state, State::Consumed { .. })
    }

    /// Number of rows matching the filter, ignoring paging. Zero if the
    /// producer failed.
    ///
    /// # Panics
    ///
    /// If called before [`Iterable::for_each`] has completed.
    pub fn total(&self) -> u64 {
        match self.state {
            State::Consumed { total, .. } => total,
            _ => panic!("Iterable::total called before consumption completed"),
        }
    }

    /// Whether consumption ended with a producer error.
    ///
    /// # Panics
    ///
    /// If called before [`Iterable::for_each`] has completed.
    pub fn is_failed(&self) -> bool {
        match self.state {
            State::Consumed { failed, .. } => failed,
            _ => panic!("Iterable::is_failed called before consumption completed"),
        }
    }
}

impl<T> fmt::Debug for Iterable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            State::NotStarted(_) => "NotStarted",
            State::InProgress => "InProgress",
            State::Consumed { .. } => "Consumed",
        };
        f.debug_struct("Iterable").field("state", &state).finish()
    }
}
