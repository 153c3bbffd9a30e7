//! Query stream adapter.
//!
//! Turns the container's push-style query protocol (one
//! [`QuerySink::record_matched`] call per match, then a completion) into a
//! pull-style [`Stream`] of decoded entities.
//!
//! The query runs in its own task and hands records over a channel with a
//! single slot, so the container can never get more than one record ahead
//! of the consumer. Dropping the stream aborts that task.

use crate::codec::RecordCodec;
use crate::container::{CloudContainer, QueryEvent, QuerySink};
use crate::error::{ClientError, ClientResult, RemoteError};
use futures::Stream;
use futures::stream::FusedStream;
use recordkit_types::QueryDescriptor;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Starts queries against a shared container.
#[derive(Clone)]
pub struct QueryStreamAdapter {
    container: Arc<dyn CloudContainer>,
}

impl QueryStreamAdapter {
    pub fn new(container: Arc<dyn CloudContainer>) -> Self {
        Self { container }
    }

    /// Returns a stream over the entities matching `query`.
    ///
    /// Nothing is sent to the container until the stream is first polled,
    /// which must happen inside a Tokio runtime.
    pub fn execute<E: RecordCodec>(&self, query: QueryDescriptor) -> QueryStream<E> {
        QueryStream {
            state: State::Idle {
                container: Arc::clone(&self.container),
                query,
            },
            record_type: E::RECORD_TYPE,
            yielded: 0,
            _entity: PhantomData,
        }
    }
}

enum State {
    Idle {
        container: Arc<dyn CloudContainer>,
        query: QueryDescriptor,
    },
    Running {
        events: mpsc::Receiver<QueryEvent>,
        task: JoinHandle<()>,
    },
    Done,
}

/// Entities matching a query, in the order the container reported them.
///
/// Ends after the last match, or after the first error (a remote failure
/// or a record that `E` cannot decode). Not restartable.
pub struct QueryStream<E> {
    state: State,
    record_type: &'static str,
    yielded: usize,
    _entity: PhantomData<fn() -> E>,
}

impl<E> QueryStream<E> {
    /// Number of entities yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    fn start(container: Arc<dyn CloudContainer>, query: QueryDescriptor) -> State {
        debug!(
            container = container.identifier(),
            record_type = %query.record_type,
            predicate = %query.predicate,
            limit = ?query.max_results(),
            "starting query"
        );
        let (tx, events) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let sink = QuerySink::new(tx.clone());
            let outcome = container.perform_query(&query, &sink).await;
            // The receiver is gone if the consumer stopped early.
            let _ = tx.send(QueryEvent::Finished(outcome)).await;
        });
        State::Running { events, task }
    }

    fn finish(&mut self) {
        if let State::Running { task, .. } = std::mem::replace(&mut self.state, State::Done) {
            task.abort();
        }
    }
}

impl<E: RecordCodec> QueryStream<E> {
    fn on_event(&mut self, event: Option<QueryEvent>) -> Option<ClientResult<E>> {
        match event {
            Some(QueryEvent::Matched(record)) => match E::decode(&record) {
                Some(entity) => {
                    self.yielded += 1;
                    Some(Ok(entity))
                }
                None => {
                    warn!(
                        record_type = %record.record_type,
                        id = %record.id,
                        yielded = self.yielded,
                        "query aborted: record could not be decoded"
                    );
                    self.finish();
                    Some(Err(ClientError::decode(&record)))
                }
            },
            Some(QueryEvent::Finished(Ok(()))) => {
                debug!(
                    record_type = self.record_type,
                    yielded = self.yielded,
                    "query finished"
                );
                self.finish();
                None
            }
            Some(QueryEvent::Finished(Err(e))) => {
                warn!(
                    record_type = self.record_type,
                    yielded = self.yielded,
                    error = %e,
                    "query failed"
                );
                self.finish();
                Some(Err(ClientError::Query(e)))
            }
            // The query task ended without reporting completion.
            None => {
                self.finish();
                Some(Err(ClientError::Query(RemoteError::Interrupted)))
            }
        }
    }
}

impl<E: RecordCodec> Stream for QueryStream<E> {
    type Item = ClientResult<E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if matches!(this.state, State::Idle { .. }) {
            if let State::Idle { container, query } =
                std::mem::replace(&mut this.state, State::Done)
            {
                this.state = Self::start(container, query);
            }
        }

        let event = match &mut this.state {
            State::Running { events, .. } => ready!(events.poll_recv(cx)),
            State::Idle { .. } | State::Done => return Poll::Ready(None),
        };
        Poll::Ready(this.on_event(event))
    }
}

impl<E: RecordCodec> FusedStream for QueryStream<E> {
    fn is_terminated(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<E> Drop for QueryStream<E> {
    fn drop(&mut self) {
        if let State::Running { task, .. } = &self.state {
            debug!(
                record_type = self.record_type,
                yielded = self.yielded,
                "query abandoned before completion"
            );
            task.abort();
        }
    }
}
