//! Task scheduling primitives shared by typefx animators.
//!
//! The central type is [`ActionQueue`]: a per-owner chain of deferred async
//! tasks that run strictly one after another on a dedicated driver task, with
//! cooperative, self-resetting cancellation.

mod fault;
mod queue;
mod spawn;
mod token;

pub use fault::{QueueFault, join_error_panic_message};
pub use queue::{ActionQueue, BoxTaskFuture, Sleep, TaskContext};
pub use spawn::spawn;
pub use token::CancelSignal;
