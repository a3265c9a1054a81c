//! Serial completion context for UI-facing callbacks.
//!
//! Flows finish on whatever runtime thread the transport completes on. Callers that
//! need their callbacks on one serial context (a UI main loop) hand flows a
//! [`CompletionQueue`] and drain the paired [`CompletionDrain`] from that context.

// crates.io
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Boxed callback scheduled on the completion context.
pub type Completion = Box<dyn FnOnce() + Send>;

/// Creates a connected queue/drain pair.
pub fn completion_queue() -> (CompletionQueue, CompletionDrain) {
	let (tx, rx) = mpsc::unbounded_channel();

	(CompletionQueue(tx), CompletionDrain(rx))
}

/// Sending half; clone it into any task that must report back.
#[derive(Clone, Debug)]
pub struct CompletionQueue(UnboundedSender<Completion>);
impl CompletionQueue {
	/// Schedules `job`. Returns `false` (and drops the job) once the drain is gone.
	pub fn dispatch(&self, job: impl 'static + Send + FnOnce()) -> bool {
		if self.0.send(Box::new(job)).is_err() {
			tracing::warn!("Completion context is closed; dropping callback.");

			return false;
		}

		true
	}
}

/// Receiving half, owned by the serial context that runs callbacks.
#[derive(Debug)]
pub struct CompletionDrain(UnboundedReceiver<Completion>);
impl CompletionDrain {
	/// Waits for the next callback and runs it. Returns `false` when every queue is gone.
	pub async fn run_next(&mut self) -> bool {
		match self.0.recv().await {
			Some(job) => {
				job();

				true
			},
			None => false,
		}
	}

	/// Runs every callback already queued without waiting. Returns how many ran.
	pub fn run_pending(&mut self) -> usize {
		let mut ran = 0;

		while let Ok(job) = self.0.try_recv() {
			job();

			ran += 1;
		}

		ran
	}
}
