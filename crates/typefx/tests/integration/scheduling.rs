use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tokio::sync::oneshot;
use tokio::time::Instant;
use typefx::{TypeFx, TypeFxError};
use typefx_surface::SurfaceError;

use crate::common::{bound, ms, page, steady};

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn verbs_only_schedule() {
	let (_, _, fx) = bound();
	fx.quick_type("abc").type_text("def");
	assert_eq!(fx.text().unwrap(), "");
	assert_eq!(fx.pending(), 2);
	fx.settled().await.unwrap();
	assert_eq!(fx.pending(), 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn steps_run_in_order_without_overlap() {
	let (_, _, fx) = bound();
	let start = Instant::now();
	fx.type_text("ab").type_text("cd").move_caret(-4).type_text(">");
	fx.settled().await.unwrap();
	assert_eq!(fx.text().unwrap(), ">abcd");
	// 2 + 2 + 4 + 1 steps of 10ms, back to back.
	assert_eq!(start.elapsed(), ms(90));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn clones_share_one_chain() {
	let (_, _, fx) = bound();
	let other = fx.clone();
	fx.type_text("ab");
	other.type_text("cd");
	fx.type_text("ef");
	other.settled().await.unwrap();
	assert_eq!(fx.text().unwrap(), "abcdef");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn settled_ignores_later_steps() {
	let (_, _, fx) = bound();
	fx.type_text("ab");
	let first = fx.settled();
	fx.wait(ms(1000));
	let start = Instant::now();
	first.await.unwrap();
	assert_eq!(start.elapsed(), ms(20));
	assert_eq!(fx.pending(), 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancel_stops_the_running_loop_at_its_next_boundary() {
	let (_, _, fx) = bound();
	fx.type_text("abcdefgh").type_text("never");
	tokio::time::sleep(ms(25)).await;
	fx.cancel();
	fx.settled().await.unwrap();
	assert_eq!(fx.text().unwrap(), "abc");

	fx.type_text("!");
	fx.settled().await.unwrap();
	assert_eq!(fx.text().unwrap(), "abc!");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancel_cuts_a_wait_short() {
	let (_, _, fx) = bound();
	let start = Instant::now();
	fx.wait(ms(10_000));
	tokio::time::sleep(ms(5)).await;
	fx.cancel().quick_type("go");
	fx.settled().await.unwrap();
	assert_eq!(start.elapsed(), ms(5));
	assert_eq!(fx.text().unwrap(), "go");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn cancel_drops_steps_queued_before_it() {
	let (_, _, fx) = bound();
	fx.quick_type("a").type_text("bcd").cancel().quick_type("z");
	fx.settled().await.unwrap();
	assert_eq!(fx.text().unwrap(), "z");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn second_cancel_drops_steps_queued_between_cancels() {
	let (_, _, fx) = bound();
	fx.type_text("aaaa").cancel().type_text("bbbb").cancel().quick_type("z");
	fx.settled().await.unwrap();
	assert_eq!(fx.text().unwrap(), "z");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn idle_cancel_does_not_block_later_steps() {
	let (_, _, fx) = bound();
	fx.cancel();
	fx.settled().await.unwrap();
	fx.type_text("ok");
	fx.settled().await.unwrap();
	assert_eq!(fx.text().unwrap(), "ok");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn detached_container_rejects_the_chain() {
	let (surface, container) = page();
	let fx = TypeFx::bind(&surface, container, steady()).unwrap();
	fx.quick_type("ab");
	fx.settled().await.unwrap();

	surface.detach(container).unwrap();
	fx.type_text("cd").quick_type("ef");
	let expected = TypeFxError::Surface(SurfaceError::Detached(container));
	assert_eq!(fx.settled().await, Err(expected.clone()));

	// Later steps are skipped and later observers see the same error.
	fx.quick_type("gh");
	assert_eq!(fx.settled().await, Err(expected));
	assert_eq!(surface.text(container).unwrap(), "ab");
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn then_runs_after_everything_scheduled_before_it() {
	let (_, _, fx) = bound();
	let (tx, rx) = oneshot::channel();
	let seen = Arc::new(Mutex::new(None));
	let probe = fx.clone();
	let slot = Arc::clone(&seen);
	fx.type_text("hi").then(move || {
		*slot.lock() = probe.text().ok();
		let _ = tx.send(());
	});
	fx.wait(ms(100)).type_text(" there");
	rx.await.unwrap();
	assert_eq!(seen.lock().as_deref(), Some("hi"));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn catch_receives_the_failure() {
	let (surface, container) = page();
	let fx = TypeFx::bind(&surface, container, steady()).unwrap();
	surface.detach(container).unwrap();
	let (tx, rx) = oneshot::channel();
	fx.type_text("x").catch(move |err| {
		let _ = tx.send(err);
	});
	assert_eq!(rx.await.unwrap(), TypeFxError::Surface(SurfaceError::Detached(container)));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn then_is_skipped_on_failure() {
	let (surface, container) = page();
	let fx = TypeFx::bind(&surface, container, steady()).unwrap();
	surface.detach(container).unwrap();
	let ran = Arc::new(Mutex::new(false));
	let flag = Arc::clone(&ran);
	fx.type_text("x").then(move || *flag.lock() = true);
	assert!(fx.settled().await.is_err());
	tokio::task::yield_now().await;
	assert!(!*ran.lock());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn finally_runs_on_success_and_failure() {
	let (surface, container) = page();
	let fx = TypeFx::bind(&surface, container, steady()).unwrap();
	let (ok_tx, ok_rx) = oneshot::channel();
	fx.quick_type("a").finally(move || {
		let _ = ok_tx.send(());
	});
	ok_rx.await.unwrap();

	surface.detach(container).unwrap();
	let (err_tx, err_rx) = oneshot::channel();
	fx.type_text("b").finally(move || {
		let _ = err_tx.send(());
	});
	err_rx.await.unwrap();
	assert!(fx.settled().await.is_err());
	assert_eq!(surface.text(container).unwrap(), "a");
}
