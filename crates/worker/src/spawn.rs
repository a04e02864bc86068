use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	// Animators are single-threaded by contract; one worker is enough when no
	// ambient runtime exists.
	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("typefx-worker-global")
			.build()
			.expect("failed to build typefx-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task on the ambient runtime, or on a lazily-built global
/// runtime when called outside of one.
pub fn spawn<F>(name: &'static str, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task = name, "worker.spawn");
	runtime_handle().spawn(fut)
}
