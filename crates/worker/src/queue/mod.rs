//! Sequential action queue.
//!
//! Every owner gets one chain of deferred tasks executed by a dedicated
//! driver task. Enqueueing is a synchronous append; the driver runs entries
//! strictly in order and publishes progress on a watch channel so callers can
//! await the state of the chain as of any point in time.
//!
//! Invariants:
//! - Tasks start only after every earlier entry has finished.
//! - Tasks of one queue never overlap.
//! - A task skipped because of cancellation or an earlier failure still
//!   counts as finished for ordering purposes.
//! - A failure rejects the chain: later tasks are skipped and every later
//!   observer sees the same error.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::fault::{QueueFault, join_error_panic_message};
use crate::token::{CancelSignal, GenerationToken};


/// Boxed future produced by one scheduled task.
pub type BoxTaskFuture<E> = Pin<Box<dyn Future<Output = Result<(), E>> + Send + 'static>>;

type BoxTask<E> = Box<dyn FnOnce(TaskContext) -> BoxTaskFuture<E> + Send + 'static>;

enum Entry<E> {
	Task { seq: u64, label: &'static str, task: BoxTask<E> },
	/// Clears a pending cancellation once everything before it has drained.
	Reset { seq: u64 },
}

impl<E> Entry<E> {
	fn seq(&self) -> u64 {
		match self {
			Self::Task { seq, .. } | Self::Reset { seq } => *seq,
		}
	}
}

#[derive(Debug)]
struct Progress<E> {
	/// Sequence number of the last finished entry.
	finished: u64,
	/// First failure, with the sequence number of the task that raised it.
	failure: Option<(u64, E)>,
}

/// Outcome of [`TaskContext::sleep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sleep {
	/// The full duration elapsed.
	Elapsed,
	/// Cancellation fired while sleeping.
	Cancelled,
}

/// Handle given to a running task for cooperative cancellation.
#[derive(Debug, Clone)]
pub struct TaskContext {
	seq: u64,
	token: GenerationToken,
}

impl TaskContext {
	/// Sequence number of the running task.
	pub fn seq(&self) -> u64 {
		self.seq
	}

	/// Cancellation generation the task was started in.
	pub fn generation(&self) -> u64 {
		self.token.generation()
	}

	/// Returns true once the owner requested cancellation.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Suspends for `duration`, waking early if cancellation fires.
	pub async fn sleep(&self, duration: Duration) -> Sleep {
		tokio::select! {
			biased;
			_ = self.token.cancelled() => Sleep::Cancelled,
			_ = tokio::time::sleep(duration) => Sleep::Elapsed,
		}
	}
}

/// Strictly ordered chain of deferred async tasks.
///
/// `E` is the error type tasks fail with. It must be cloneable so every
/// observer of a rejected chain receives the failure.
pub struct ActionQueue<E> {
	name: &'static str,
	/// Last assigned sequence number, locked across the send so sequence
	/// order always matches channel order.
	ingress: Mutex<Ingress<E>>,
	signal: CancelSignal,
	progress: watch::Receiver<Progress<E>>,
}

struct Ingress<E> {
	last_seq: u64,
	tx: mpsc::UnboundedSender<Entry<E>>,
}

impl<E> fmt::Debug for ActionQueue<E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionQueue")
			.field("name", &self.name)
			.field("pending", &self.pending())
			.field("cancelled", &self.signal.is_cancelled())
			.finish()
	}
}

impl<E> ActionQueue<E> {
	/// Returns true while a cancellation is waiting to drain.
	pub fn is_cancelled(&self) -> bool {
		self.signal.is_cancelled()
	}

	/// Number of entries enqueued but not yet finished.
	pub fn pending(&self) -> u64 {
		let last = self.ingress.lock().unwrap_or_else(PoisonError::into_inner).last_seq;
		last.saturating_sub(self.progress.borrow().finished)
	}
}

impl<E> ActionQueue<E>
where
	E: From<QueueFault> + Clone + Send + Sync + 'static,
{
	/// Creates an empty queue and spawns its driver.
	pub fn new(name: &'static str) -> Self {
		let (tx, rx) = mpsc::unbounded_channel();
		let (progress_tx, progress_rx) = watch::channel(Progress { finished: 0, failure: None });
		let signal = CancelSignal::new();
		crate::spawn(name, drive(name, rx, signal.clone(), progress_tx));
		Self {
			name,
			ingress: Mutex::new(Ingress { last_seq: 0, tx }),
			signal,
			progress: progress_rx,
		}
	}

	/// Appends a task to the end of the chain and returns its sequence number.
	///
	/// Never blocks. The task starts once every earlier entry has finished.
	pub fn enqueue<F, Fut>(&self, label: &'static str, task: F) -> u64
	where
		F: FnOnce(TaskContext) -> Fut + Send + 'static,
		Fut: Future<Output = Result<(), E>> + Send + 'static,
	{
		let task: BoxTask<E> = Box::new(move |ctx| Box::pin(task(ctx)));
		self.push(|seq| Entry::Task { seq, label, task })
	}

	/// Requests cancellation of everything currently queued or running.
	///
	/// Queued tasks are skipped, running tasks see the flag at their next
	/// iteration boundary. The flag clears itself once the chain up to this
	/// call has drained, so work enqueued afterwards runs normally.
	pub fn cancel(&self) {
		let seq = self.push(|seq| {
			self.signal.cancel_until(seq);
			Entry::Reset { seq }
		});
		tracing::debug!(queue = self.name, seq, generation = self.signal.generation(), "queue.cancel");
	}

	/// Resolves once every entry enqueued before this call has finished.
	///
	/// Yields the first failure at or before that point, if any. Entries
	/// enqueued after the call are not awaited.
	pub fn settled(&self) -> impl Future<Output = Result<(), E>> + Send + 'static {
		let target = self.ingress.lock().unwrap_or_else(PoisonError::into_inner).last_seq;
		let mut progress = self.progress.clone();
		async move {
			if let Ok(p) = progress.wait_for(|p| reached(p, target)).await {
				return settle(&p, target);
			}
			// Driver gone: whatever it published last is final.
			let p = progress.borrow();
			if reached(&p, target) {
				settle(&p, target)
			} else {
				Err(E::from(QueueFault::DriverStopped))
			}
		}
	}

	fn push(&self, make: impl FnOnce(u64) -> Entry<E>) -> u64 {
		let mut ingress = self.ingress.lock().unwrap_or_else(PoisonError::into_inner);
		ingress.last_seq = ingress.last_seq.wrapping_add(1);
		let entry = make(ingress.last_seq);
		let seq = entry.seq();
		if ingress.tx.send(entry).is_err() {
			tracing::warn!(queue = self.name, seq, "queue.enqueue: driver gone, entry dropped");
		} else {
			tracing::trace!(queue = self.name, seq, "queue.enqueue");
		}
		seq
	}
}

fn reached<E>(progress: &Progress<E>, target: u64) -> bool {
	progress.finished >= target || matches!(progress.failure, Some((seq, _)) if seq <= target)
}

fn settle<E: Clone>(progress: &Progress<E>, target: u64) -> Result<(), E> {
	match &progress.failure {
		Some((seq, err)) if *seq <= target => Err(err.clone()),
		_ => Ok(()),
	}
}

async fn drive<E>(name: &'static str, mut rx: mpsc::UnboundedReceiver<Entry<E>>, signal: CancelSignal, progress: watch::Sender<Progress<E>>)
where
	E: From<QueueFault> + Clone + Send + Sync + 'static,
{
	while let Some(entry) = rx.recv().await {
		let mut failure = None;
		let seq = match entry {
			Entry::Reset { seq } => {
				if signal.reset_at(seq) {
					tracing::debug!(queue = name, seq, generation = signal.generation(), "queue.cancel_drained");
				}
				seq
			}
			Entry::Task { seq, label, task } => {
				let token = signal.token();
				let rejected = progress.borrow().failure.is_some();
				if rejected {
					tracing::trace!(queue = name, seq, task = label, "queue.skip_rejected");
				} else if token.is_cancelled() {
					tracing::trace!(queue = name, seq, task = label, "queue.skip_cancelled");
				} else {
					tracing::trace!(queue = name, seq, task = label, generation = token.generation(), "queue.start");
					// Run on its own task so a panic surfaces as a join error
					// instead of taking the driver down.
					let result = match tokio::spawn(task(TaskContext { seq, token })).await {
						Ok(result) => result,
						Err(err) => Err(E::from(QueueFault::Panicked {
							message: join_error_panic_message(err),
						})),
					};
					match result {
						Ok(()) => tracing::trace!(queue = name, seq, task = label, "queue.finish"),
						Err(err) => {
							tracing::warn!(queue = name, seq, task = label, "queue.task_failed");
							failure = Some((seq, err));
						}
					}
				}
				seq
			}
		};
		progress.send_modify(|p| {
			p.finished = seq;
			if p.failure.is_none() {
				p.failure = failure;
			}
		});
	}
	tracing::trace!(queue = name, "queue.driver_exit");
}
