//! Handler registry keyed by `(request type, result type)`.
//!
//! Registries are assembled once at startup through a builder and frozen.
//! The frozen registry is shared read-only, so lookups take no locks.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::handler::{Command, CommandHandler, Query, QueryHandler};
use crate::{WorkforceError, WorkforceResult};

pub(crate) type AnyBox = Box<dyn Any + Send>;

/// Which side of the command/query split a registry serves.
pub trait RequestKind: Send + Sync + 'static {
    /// Label used in logs and metrics.
    const LABEL: &'static str;
}

/// Marker for query registries.
#[derive(Debug)]
pub enum QueryKind {}

/// Marker for command registries.
#[derive(Debug)]
pub enum CommandKind {}

impl RequestKind for QueryKind {
    const LABEL: &'static str = "query";
}

impl RequestKind for CommandKind {
    const LABEL: &'static str = "command";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HandlerKey {
    request: TypeId,
    result: TypeId,
}

impl HandlerKey {
    pub(crate) fn of<Req: 'static, Res: 'static>() -> Self {
        Self {
            request: TypeId::of::<Req>(),
            result: TypeId::of::<Res>(),
        }
    }
}

#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    async fn handle_erased(&self, request: AnyBox, cancel: &CancellationToken) -> WorkforceResult<Option<AnyBox>>;
}

struct QueryAdapter<Q, R, H> {
    inner: H,
    _types: PhantomData<fn(Q) -> R>,
}

#[async_trait]
impl<Q, R, H> ErasedHandler for QueryAdapter<Q, R, H>
where
    Q: Query,
    R: Send + 'static,
    H: QueryHandler<Q, R>,
{
    async fn handle_erased(&self, request: AnyBox, cancel: &CancellationToken) -> WorkforceResult<Option<AnyBox>> {
        let query = request
            .downcast::<Q>()
            .map_err(|_| WorkforceError::internal(format!("request is not a {}", Q::NAME)))?;
        let result = self.inner.handle(*query, cancel).await?;
        Ok(result.map(|r| Box::new(r) as AnyBox))
    }
}

struct CommandAdapter<C, R, H> {
    inner: H,
    _types: PhantomData<fn(C) -> R>,
}

#[async_trait]
impl<C, R, H> ErasedHandler for CommandAdapter<C, R, H>
where
    C: Command,
    R: Send + 'static,
    H: CommandHandler<C, R>,
{
    async fn handle_erased(&self, request: AnyBox, cancel: &CancellationToken) -> WorkforceResult<Option<AnyBox>> {
        let command = request
            .downcast::<C>()
            .map_err(|_| WorkforceError::internal(format!("request is not a {}", C::NAME)))?;
        let result = self.inner.handle(*command, cancel).await?;
        Ok(result.map(|r| Box::new(r) as AnyBox))
    }
}

pub(crate) struct Registration {
    pub(crate) request: &'static str,
    pub(crate) handler: Arc<dyn ErasedHandler>,
}

/// Frozen mapping from `(request, result)` to exactly one handler.
pub struct HandlerRegistry<K> {
    handlers: HashMap<HandlerKey, Registration>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: RequestKind> HandlerRegistry<K> {
    /// Starts an empty registry.
    #[must_use]
    pub fn builder() -> HandlerRegistryBuilder<K> {
        HandlerRegistryBuilder {
            handlers: HashMap::new(),
            _kind: PhantomData,
        }
    }

    pub(crate) fn get(&self, key: HandlerKey) -> Option<&Registration> {
        self.handlers.get(&key)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered request names, sorted.
    #[must_use]
    pub fn request_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.values().map(|r| r.request).collect();
        names.sort_unstable();
        names
    }
}

impl<K> std::fmt::Debug for HandlerRegistry<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Collects handlers before the registry is frozen.
pub struct HandlerRegistryBuilder<K> {
    handlers: HashMap<HandlerKey, Registration>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: RequestKind> HandlerRegistryBuilder<K> {
    fn insert<Req: 'static, Res: 'static>(
        mut self,
        request: &'static str,
        handler: Arc<dyn ErasedHandler>,
    ) -> WorkforceResult<Self> {
        let key = HandlerKey::of::<Req, Res>();
        if self.handlers.contains_key(&key) {
            return Err(WorkforceError::HandlerAlreadyRegistered {
                request,
                result: type_name::<Res>(),
            });
        }
        debug!(kind = K::LABEL, request, result = type_name::<Res>(), "Registered handler");
        self.handlers.insert(key, Registration { request, handler });
        Ok(self)
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> HandlerRegistry<K> {
        info!(kind = K::LABEL, handlers = self.handlers.len(), "Handler registry built");
        HandlerRegistry {
            handlers: self.handlers,
            _kind: PhantomData,
        }
    }
}

impl HandlerRegistryBuilder<QueryKind> {
    /// Registers the handler for `(Q, R)`.
    ///
    /// # Errors
    /// Fails if a handler for the same pair is already registered.
    pub fn register<Q, R, H>(self, handler: H) -> WorkforceResult<Self>
    where
        Q: Query,
        R: Send + 'static,
        H: QueryHandler<Q, R> + 'static,
    {
        let adapter = QueryAdapter {
            inner: handler,
            _types: PhantomData::<fn(Q) -> R>,
        };
        self.insert::<Q, R>(Q::NAME, Arc::new(adapter))
    }
}

impl HandlerRegistryBuilder<CommandKind> {
    /// Registers the handler for `(C, R)`.
    ///
    /// # Errors
    /// Fails if a handler for the same pair is already registered.
    pub fn register<C, R, H>(self, handler: H) -> WorkforceResult<Self>
    where
        C: Command,
        R: Send + 'static,
        H: CommandHandler<C, R> + 'static,
    {
        let adapter = CommandAdapter {
            inner: handler,
            _types: PhantomData::<fn(C) -> R>,
        };
        self.insert::<C, R>(C::NAME, Arc::new(adapter))
    }
}

/// Registry of query handlers.
pub type QueryRegistry = HandlerRegistry<QueryKind>;

/// Registry of command handlers.
pub type CommandRegistry = HandlerRegistry<CommandKind>;
