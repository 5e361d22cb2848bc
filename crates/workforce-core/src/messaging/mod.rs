//! CQRS messaging: request traits, the handler registry, and the query and
//! command dispatchers.

mod cancel;
mod dispatcher;
mod handler;
mod registry;

pub use cancel::{ensure_active, until_cancelled};
pub use dispatcher::{names, CommandDispatcher, Dispatcher, QueryDispatcher};
pub use handler::{Command, CommandHandler, Query, QueryHandler};
pub use registry::{
    CommandKind, CommandRegistry, HandlerRegistry, HandlerRegistryBuilder, QueryKind, QueryRegistry, RequestKind,
};
pub use tokio_util::sync::CancellationToken;
