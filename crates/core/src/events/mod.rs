//! Domain events module.
//!
//! Services emit events through a `DomainEventSink` after successful
//! allocation writes so hosts can invalidate cached portfolio views.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
