//! Request orchestration: the ask flow and the gateway builder.

mod ask;
mod builder;

pub use ask::AskGateway;
pub use builder::{Mimir, MimirBuilder};
