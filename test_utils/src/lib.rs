//! Utility helpers for tests.
//!
//! [`session`] builds games in known states; [`picking`] turns robots into
//! clicks and scripted ray hits.

pub mod picking;
pub mod session;

use whackabot::HudEvent;

/// Assert that `events` contains every event in `expected`.
///
/// # Panics
/// Panics with a helpful message if any event is missing.
pub fn assert_hud_contains(events: &[HudEvent], expected: &[HudEvent]) {
    for event in expected {
        assert!(
            events.contains(event),
            "{event:?} not found in {events:?}"
        );
    }
}
