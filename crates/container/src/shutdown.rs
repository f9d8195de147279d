use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use hivemind_model::RegistryShutdownListener;
use parking_lot::Mutex;

/// One-way shutdown flag plus the listeners told when it flips.
///
/// The flag and the listener list change together under the list's lock, so a
/// listener is either notified by [`shutdown`](Self::shutdown) or, when added
/// late, notified immediately; never neither, never both.
#[derive(Default)]
pub struct ShutdownCoordinator {
	down: AtomicBool,
	listeners: Mutex<Vec<Arc<dyn RegistryShutdownListener>>>,
}

impl ShutdownCoordinator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_shutdown(&self) -> bool {
		self.down.load(Ordering::Acquire)
	}

	/// Listeners added after shutdown are notified immediately, on the
	/// calling thread.
	pub fn add_listener(&self, listener: Arc<dyn RegistryShutdownListener>) {
		{
			let mut listeners = self.listeners.lock();
			if !self.is_shutdown() {
				listeners.push(listener);
				return;
			}
		}
		listener.registry_did_shutdown();
	}

	/// Idempotent. Listeners are notified exactly once, outside the lock.
	pub fn shutdown(&self) {
		let listeners = {
			let mut listeners = self.listeners.lock();
			if self.down.swap(true, Ordering::AcqRel) {
				return;
			}
			std::mem::take(&mut *listeners)
		};
		for listener in listeners {
			listener.registry_did_shutdown();
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::AtomicUsize;

	use super::*;

	struct Count(AtomicUsize);

	impl RegistryShutdownListener for Count {
		fn registry_did_shutdown(&self) {
			self.0.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[test]
	fn listeners_fire_exactly_once() {
		let coordinator = ShutdownCoordinator::new();
		let listener = Arc::new(Count(AtomicUsize::new(0)));
		coordinator.add_listener(listener.clone());

		coordinator.shutdown();
		coordinator.shutdown();

		assert!(coordinator.is_shutdown());
		assert_eq!(listener.0.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn late_listeners_fire_immediately() {
		let coordinator = ShutdownCoordinator::new();
		coordinator.shutdown();

		let listener = Arc::new(Count(AtomicUsize::new(0)));
		coordinator.add_listener(listener.clone());
		assert_eq!(listener.0.load(Ordering::SeqCst), 1);
	}
}
