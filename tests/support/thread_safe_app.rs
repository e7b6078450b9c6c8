//! Shared Bevy `App` for rspec fixtures.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Simulated time each [`SharedApp::tick`] advances.
pub const FRAME: Duration = Duration::from_millis(100);

/// `App` wrapper that is `Send` and `Sync` because every access is
/// mutex-guarded.
#[derive(Debug)]
pub struct ThreadSafeApp(pub App);

// SAFETY: rspec fixtures must be `Send + Sync`. Suites run serially through
// `run_serial`, and the wrapped `App` is only reached through the mutex in
// `SharedApp`.
unsafe impl Send for ThreadSafeApp {}
unsafe impl Sync for ThreadSafeApp {}

fn prepare(mut app: App) -> App {
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.finish();
    app.cleanup();
    app
}

/// Cloneable handle to one app, ticked on simulated time.
#[derive(Debug, Clone)]
pub struct SharedApp(Arc<Mutex<ThreadSafeApp>>);

impl SharedApp {
    /// Wraps a configured app and pins its clock to [`FRAME`] steps.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self(Arc::new(Mutex::new(ThreadSafeApp(prepare(app)))))
    }

    /// Swaps in a freshly configured app for every clone of this handle.
    pub fn replace(&self, app: App) {
        self.lock().0 = prepare(app);
    }

    /// Locks the app, recovering from a poisoned mutex.
    pub fn lock(&self) -> MutexGuard<'_, ThreadSafeApp> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one frame.
    pub fn tick(&self) {
        self.lock().0.update();
    }

    /// Runs `frames` frames.
    pub fn tick_n(&self, frames: usize) {
        let mut app = self.lock();
        for _ in 0..frames {
            app.0.update();
        }
    }
}
