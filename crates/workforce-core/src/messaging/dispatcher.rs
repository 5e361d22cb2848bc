//! Query and command dispatchers.

use std::any::type_name;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use super::handler::{Command, Query};
use super::registry::{CommandKind, HandlerKey, HandlerRegistry, QueryKind, RequestKind};
use crate::{WorkforceError, WorkforceResult};

/// Metric names emitted by the dispatchers.
pub mod names {
    /// Dispatches by kind, request and outcome.
    pub const DISPATCH_TOTAL: &str = "workforce_dispatch_total";
    /// Handler latency in seconds.
    pub const DISPATCH_DURATION_SECONDS: &str = "workforce_dispatch_duration_seconds";
}

/// Routes a request to the single handler registered for its
/// `(request, result)` pair.
///
/// The dispatcher passes the cancellation token through unchanged and never
/// times out or retries.
pub struct Dispatcher<K> {
    registry: Arc<HandlerRegistry<K>>,
}

/// Dispatcher over query handlers.
pub type QueryDispatcher = Dispatcher<QueryKind>;

/// Dispatcher over command handlers.
pub type CommandDispatcher = Dispatcher<CommandKind>;

impl<K: RequestKind> Dispatcher<K> {
    /// Creates a dispatcher over a frozen registry.
    #[must_use]
    pub fn new(registry: HandlerRegistry<K>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// The registry this dispatcher routes through.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry<K> {
        &self.registry
    }

    async fn route<Req, Res>(
        &self,
        name: &'static str,
        request: Req,
        cancel: &CancellationToken,
    ) -> WorkforceResult<Option<Res>>
    where
        Req: Send + 'static,
        Res: Send + 'static,
    {
        let Some(registration) = self.registry.get(HandlerKey::of::<Req, Res>()) else {
            counter!(names::DISPATCH_TOTAL, "kind" => K::LABEL, "request" => name, "outcome" => "handler_not_found")
                .increment(1);
            error!(kind = K::LABEL, request = name, result = type_name::<Res>(), "No handler registered");
            return Err(WorkforceError::HandlerNotFound {
                request: name,
                result: type_name::<Res>(),
            });
        };

        debug!(kind = K::LABEL, request = name, "Dispatching");
        let started = Instant::now();
        let outcome = registration.handler.handle_erased(Box::new(request), cancel).await;
        histogram!(names::DISPATCH_DURATION_SECONDS, "kind" => K::LABEL, "request" => name)
            .record(started.elapsed().as_secs_f64());

        let label = match &outcome {
            Ok(Some(_)) => "ok",
            Ok(None) => "empty",
            Err(WorkforceError::Cancelled) => "cancelled",
            Err(_) => "error",
        };
        counter!(names::DISPATCH_TOTAL, "kind" => K::LABEL, "request" => name, "outcome" => label).increment(1);

        match outcome? {
            None => Ok(None),
            Some(boxed) => boxed
                .downcast::<Res>()
                .map(|result| Some(*result))
                .map_err(|_| WorkforceError::internal(format!("handler for {name} returned an unexpected type"))),
        }
    }
}

impl Dispatcher<QueryKind> {
    /// Dispatches a query to its handler.
    ///
    /// # Errors
    /// `HandlerNotFound` when nothing is registered for `(Q, R)`; otherwise
    /// whatever the handler returns.
    pub async fn dispatch<Q, R>(&self, query: Q, cancel: &CancellationToken) -> WorkforceResult<Option<R>>
    where
        Q: Query,
        R: Send + 'static,
    {
        self.route::<Q, R>(Q::NAME, query, cancel).await
    }
}

impl Dispatcher<CommandKind> {
    /// Dispatches a command to its handler.
    ///
    /// # Errors
    /// `HandlerNotFound` when nothing is registered for `(C, R)`; otherwise
    /// whatever the handler returns.
    pub async fn dispatch<C, R>(&self, command: C, cancel: &CancellationToken) -> WorkforceResult<Option<R>>
    where
        C: Command,
        R: Send + 'static,
    {
        self.route::<C, R>(C::NAME, command, cancel).await
    }
}

impl<K> std::fmt::Debug for Dispatcher<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("registry", &self.registry).finish()
    }
}
