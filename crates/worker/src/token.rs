use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for cancellation epochs.
#[derive(Debug, Default)]
pub(crate) struct GenerationClock {
	next: AtomicU64,
}

impl GenerationClock {
	/// Returns the next generation ID, starting at 1.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Generation-scoped cancellation token handed to one running task.
#[derive(Debug, Clone)]
pub(crate) struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	pub const fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}

/// Resettable cancellation flag shared by a queue, its driver, and its tasks.
///
/// Cancelling trips the token of the current generation. Tasks that captured
/// that generation observe it; a [`reset`](Self::reset) moves the signal to a
/// fresh generation so that later work runs normally again.
#[derive(Debug, Clone)]
pub struct CancelSignal {
	inner: Arc<SignalInner>,
}

#[derive(Debug)]
struct SignalInner {
	clock: GenerationClock,
	current: Mutex<GenerationToken>,
	/// Sequence number of the reset entry that ends the active cancellation.
	drain_at: AtomicU64,
}

impl Default for CancelSignal {
	fn default() -> Self {
		Self::new()
	}
}

impl CancelSignal {
	pub fn new() -> Self {
		let clock = GenerationClock::default();
		let current = GenerationToken::new(clock.next());
		Self {
			inner: Arc::new(SignalInner {
				clock,
				current: Mutex::new(current),
				drain_at: AtomicU64::new(0),
			}),
		}
	}

	pub(crate) fn token(&self) -> GenerationToken {
		self.inner.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
	}

	/// Returns the active generation.
	pub fn generation(&self) -> u64 {
		self.token().generation()
	}

	/// Returns true when the active generation has been cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.token().is_cancelled()
	}

	/// Cancels the active generation.
	pub fn cancel(&self) {
		self.token().cancel();
	}

	/// Cancels the active generation until the reset tagged `seq` drains.
	///
	/// A later call moves the tag forward, so earlier resets no longer clear
	/// the flag.
	pub fn cancel_until(&self, seq: u64) {
		self.inner.drain_at.store(seq, Ordering::Release);
		self.cancel();
	}

	/// Resets only when `seq` tags the latest cancellation.
	pub fn reset_at(&self, seq: u64) -> bool {
		if self.inner.drain_at.load(Ordering::Acquire) != seq {
			return false;
		}
		self.reset()
	}

	/// Starts a fresh generation if the active one was cancelled.
	///
	/// Returns true when a new generation was started.
	pub fn reset(&self) -> bool {
		let mut current = self.inner.current.lock().unwrap_or_else(PoisonError::into_inner);
		if !current.is_cancelled() {
			return false;
		}
		*current = GenerationToken::new(self.inner.clock.next());
		true
	}
}
