use crate::player::action::Action;
use crate::player::state::PlaybackState;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::trace;

type Observer = Arc<dyn Fn(&PlaybackState) + Send + Sync>;

/// Exclusive owner of a [`PlaybackState`].
///
/// Cloning the store yields another handle to the same state. Every [`PlaybackStore::dispatch`]
/// runs the transition and notifies all observers before the next dispatch can start.
#[derive(Clone)]
pub struct PlaybackStore {
	inner: Arc<Inner>,
}

struct Inner {
	/// Held for a whole dispatch, so transitions and their notifications never interleave.
	dispatch: Mutex<()>,
	state: Mutex<PlaybackState>,
	observers: Mutex<Observers>,
	watch_sender: watch::Sender<PlaybackState>,
}

#[derive(Default)]
struct Observers {
	next_id: u64,
	by_id: BTreeMap<u64, Observer>,
}

impl Default for PlaybackStore {
	fn default() -> Self {
		Self::new(PlaybackState::default())
	}
}

impl PlaybackStore {
	pub fn new(initial_state: PlaybackState) -> Self {
		let (watch_sender, _) = watch::channel(initial_state);
		Self {
			inner: Arc::new(Inner {
				dispatch: Mutex::new(()),
				state: Mutex::new(initial_state),
				observers: Default::default(),
				watch_sender,
			}),
		}
	}

	pub fn state(&self) -> PlaybackState {
		*self.inner.state.lock()
	}

	/// Applies `action` and synchronously notifies every observer with the new state.
	///
	/// Observers may read [`PlaybackStore::state`], but must not dispatch from within their
	/// callback.
	pub fn dispatch(&self, action: impl Into<Action>) {
		let action = action.into();
		let _dispatch = self.inner.dispatch.lock();
		let new_state = {
			let mut state = self.inner.state.lock();
			*state = state.apply(action);
			*state
		};
		trace!("Applied {action:?}, state is now {new_state:?}");

		// snapshot so observers can (un)subscribe while being notified
		let observers: Vec<Observer> = self.inner.observers.lock().by_id.values().cloned().collect();
		for observer in observers {
			(*observer)(&new_state);
		}
		self.inner.watch_sender.send_replace(new_state);
	}

	/// Registers `observer` until the returned [`Subscription`] is dropped.
	#[must_use = "the observer is removed once the subscription is dropped"]
	pub fn subscribe(&self, observer: impl Fn(&PlaybackState) + Send + Sync + 'static) -> Subscription {
		let mut observers = self.inner.observers.lock();
		let id = observers.next_id;
		observers.next_id += 1;
		observers.by_id.insert(id, Arc::new(observer));

		Subscription {
			id,
			store: Arc::downgrade(&self.inner),
		}
	}

	/// Receiver of the latest state for consumers running on their own task.
	pub fn watch(&self) -> watch::Receiver<PlaybackState> {
		self.inner.watch_sender.subscribe()
	}
}

/// Keeps an observer registered with a [`PlaybackStore`].
#[must_use = "the observer is removed once the subscription is dropped"]
pub struct Subscription {
	id: u64,
	store: Weak<Inner>,
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(store) = self.store.upgrade() {
			store.observers.lock().by_id.remove(&self.id);
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::player::action::PlaybackPatch;
	use static_assertions::assert_impl_all;

	assert_impl_all!(PlaybackStore: Send, Sync);

	fn recording_observer(store: &PlaybackStore) -> (Arc<Mutex<Vec<PlaybackState>>>, Subscription) {
		let recorded = Arc::new(Mutex::new(Vec::new()));
		let subscription = store.subscribe({
			let recorded = recorded.clone();
			move |state| recorded.lock().push(*state)
		});
		(recorded, subscription)
	}

	#[test]
	fn dispatch_should_apply_the_transition() {
		let store = PlaybackStore::default();

		store.dispatch(Action::TogglePlay);
		store.dispatch(PlaybackPatch::builder().volume(0.25).build());

		let state = store.state();
		assert!(state.playing);
		assert_eq!(state.volume, 0.25);
	}

	#[test]
	fn observers_should_be_able_to_read_the_state() {
		let store = PlaybackStore::default();
		let volumes = Arc::new(Mutex::new(Vec::new()));
		let _subscription = store.subscribe({
			let store = store.clone();
			let volumes = volumes.clone();
			move |_| volumes.lock().push(store.state().volume)
		});

		store.dispatch(PlaybackPatch::builder().volume(0.5).build());

		assert_eq!(*volumes.lock(), vec![0.5]);
	}

	#[test]
	fn observers_should_be_notified_in_dispatch_order() {
		let store = PlaybackStore::default();
		let (recorded, _subscription) = recording_observer(&store);

		store.dispatch(PlaybackPatch::builder().progress(0.1).build());
		store.dispatch(PlaybackPatch::builder().progress(0.2).build());
		store.dispatch(Action::TogglePlay);

		let recorded = recorded.lock();
		assert_eq!(recorded.len(), 3);
		assert_eq!(recorded[0].progress, 0.1);
		assert_eq!(recorded[1].progress, 0.2);
		assert!(recorded[2].playing);
	}

	#[test]
	fn every_observer_should_see_the_same_state() {
		let store = PlaybackStore::default();
		let (first, _first_subscription) = recording_observer(&store);
		let (second, _second_subscription) = recording_observer(&store);

		store.dispatch(PlaybackPatch::builder().hide_controls(true).build());

		assert_eq!(*first.lock(), *second.lock());
		assert_eq!(first.lock().len(), 1);
	}

	#[test]
	fn dropping_the_subscription_should_stop_notifications() {
		let store = PlaybackStore::default();
		let (recorded, subscription) = recording_observer(&store);

		store.dispatch(Action::TogglePlay);
		drop(subscription);
		store.dispatch(Action::TogglePlay);

		assert_eq!(recorded.lock().len(), 1);
	}

	#[test]
	fn subscription_should_outlive_the_store() {
		let store = PlaybackStore::default();
		let (_recorded, subscription) = recording_observer(&store);

		drop(store);
		drop(subscription);
	}

	#[test]
	fn observers_should_observe_clamped_state() {
		let store = PlaybackStore::default();
		let (recorded, _subscription) = recording_observer(&store);

		store.dispatch(PlaybackPatch::builder().progress(1.5).loaded(0.2).build());

		let recorded = recorded.lock();
		assert_eq!(recorded[0].progress, 1.0);
		assert_eq!(recorded[0].loaded, 1.0);
	}

	#[tokio::test]
	async fn watch_should_receive_the_latest_state() {
		let store = PlaybackStore::default();
		let mut receiver = store.watch();

		store.dispatch(Action::TogglePlay);

		receiver.changed().await.expect("Store was dropped");
		assert!(receiver.borrow_and_update().playing);
	}
}
