use std::sync::Arc;

use parking_lot::Mutex;

/// Told when the calling thread's unit of work ends.
pub trait ThreadCleanupListener: Send + Sync {
	fn thread_did_cleanup(&self);
}

/// Fan-out for thread-boundary events.
///
/// Listeners run on whichever thread declared the boundary; thread-bound
/// service models rely on this to reach their `thread_local!` state.
#[derive(Default)]
pub struct ThreadEventNotifier {
	listeners: Mutex<Vec<Arc<dyn ThreadCleanupListener>>>,
}

impl ThreadEventNotifier {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_listener(&self, listener: Arc<dyn ThreadCleanupListener>) {
		self.listeners.lock().push(listener);
	}

	pub fn fire_thread_cleanup(&self) {
		let listeners: Vec<_> = self.listeners.lock().clone();
		for listener in listeners {
			listener.thread_did_cleanup();
		}
	}
}
