use thiserror::Error;
use tokio::task::JoinError;

/// Failure raised by the queue itself rather than by a task's own logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueFault {
	/// A scheduled task panicked.
	#[error("task panicked: {}", message.as_deref().unwrap_or("<unknown panic>"))]
	Panicked {
		/// Panic payload when it was a string.
		message: Option<String>,
	},
	/// The driver stopped before the observed part of the chain finished.
	#[error("action queue driver stopped before the chain settled")]
	DriverStopped,
}

/// Extracts the panic message from a join error.
///
/// Returns `None` when the task was aborted rather than panicking.
pub fn join_error_panic_message(err: JoinError) -> Option<String> {
	if !err.is_panic() {
		return None;
	}
	let payload = err.into_panic();
	if let Some(s) = payload.downcast_ref::<&'static str>() {
		return Some((*s).to_string());
	}
	if let Some(s) = payload.downcast_ref::<String>() {
		return Some(s.clone());
	}
	Some("<non-string panic payload>".to_string())
}
