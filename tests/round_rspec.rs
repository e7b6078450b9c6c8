//! Behavioural tests for scoring and round expiry.
//!
//! A 30 second round awarding five points per hit. The middle robot is
//! clicked at the top of its bob through the stock camera, then the clock
//! is walked up to and across the deadline.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use test_utils::picking::{centre_click, click_on, scenery_only};
use test_utils::session::{bob_peak, fixed_settings, idle_session, nth_robot, state_of, WAKE_MS};
use whackabot::{ClickOutcome, GameSession, HudEvent, Millis, RobotId, RobotState};

const MIDDLE: usize = 4;
const DEADLINE: Millis = 30_000;

/// Fixture sharing one session across rspec closures.
#[derive(Debug, Clone)]
struct RoundFixture {
    session: Arc<Mutex<GameSession>>,
}

impl RoundFixture {
    fn bootstrap() -> Self {
        Self {
            session: Arc::new(Mutex::new(idle_session(fixed_settings()))),
        }
    }

    fn session(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts over with every robot idle since [`WAKE_MS`].
    fn restart(&self) {
        *self.session() = idle_session(fixed_settings());
    }

    fn target(&self) -> RobotId {
        nth_robot(&self.session(), MIDDLE)
    }

    /// Clicks the middle robot where it is drawn at its highest point.
    fn click_target(&self) -> ClickOutcome {
        let mut session = self.session();
        let robot = nth_robot(&session, MIDDLE);
        let now = bob_peak(&session, WAKE_MS);
        let click = click_on(&session, robot, now);
        session
            .click(click, now)
            .unwrap_or_else(|e| panic!("click failed: {e}"))
    }

    fn tick(&self, now: Millis) -> bool {
        self.session()
            .tick(now)
            .unwrap_or_else(|e| panic!("tick failed: {e}"))
            .round_reset
    }

    fn score(&self) -> u32 {
        self.session().current_score()
    }
}

fn describe_hit(scenario: &mut Scenario<RoundFixture>) {
    scenario.when("the middle robot is clicked at the top of its bob", |ctx| {
        ctx.before_each(|state| {
            state.restart();
            let outcome = state.click_target();
            assert!(
                matches!(outcome, ClickOutcome::Scored { .. }),
                "expected a hit, got {outcome:?}"
            );
        });

        ctx.then("the reward is added to the score", |state| {
            assert_eq!(state.score(), 5);
        });

        ctx.then("the robot starts dying", |state| {
            let robot = state.target();
            assert_eq!(state_of(&state.session(), robot), RobotState::Dying);
        });

        ctx.then("the HUD is told about the new score", |state| {
            let events: Vec<_> = state.session().drain_hud_events().collect();
            assert!(events.contains(&HudEvent::ScoreChanged(5)), "{events:?}");
        });

        ctx.then("a second click on the dying robot is ignored", |state| {
            let robot = state.target();
            assert_eq!(state.click_target(), ClickOutcome::Ignored { robot });
            assert_eq!(state.score(), 5);
        });
    });
}

fn describe_expiry(scenario: &mut Scenario<RoundFixture>) {
    scenario.when("the clock reaches one millisecond before the deadline", |ctx| {
        ctx.before_each(|state| {
            state.restart();
            state.click_target();
            assert!(!state.tick(DEADLINE - 1));
        });

        ctx.then("the score is kept", |state| {
            assert_eq!(state.score(), 5);
        });

        ctx.then("the countdown shows zero seconds", |state| {
            assert_eq!(state.session().remaining_seconds(DEADLINE - 1), 0);
        });
    });

    scenario.when("the clock reaches the deadline", |ctx| {
        ctx.before_each(|state| {
            state.restart();
            state.click_target();
            assert!(state.tick(DEADLINE));
        });

        ctx.then("the score is reset", |state| {
            assert_eq!(state.score(), 0);
        });

        ctx.then("a fresh round runs to the next deadline", |state| {
            let session = state.session();
            assert_eq!(session.round().deadline(), Some(2 * DEADLINE));
            assert_eq!(session.remaining_seconds(DEADLINE), 30);
        });

        ctx.then("the HUD shows the zeroed score and full countdown", |state| {
            let events: Vec<_> = state.session().drain_hud_events().collect();
            assert!(events.contains(&HudEvent::ScoreChanged(0)), "{events:?}");
            assert!(events.contains(&HudEvent::TimeChanged(30)), "{events:?}");
        });
    });
}

fn describe_miss(scenario: &mut Scenario<RoundFixture>) {
    scenario.when("only the ground is under the pointer", |ctx| {
        ctx.before_each(|state| {
            state.restart();
        });

        ctx.then("the click misses and nothing changes", |state| {
            let mut session = state.session();
            let now = bob_peak(&session, WAKE_MS);
            let outcome = session
                .click_with(centre_click(), &scenery_only(), now)
                .unwrap_or_else(|e| panic!("click failed: {e}"));
            assert_eq!(outcome, ClickOutcome::Missed);
            assert_eq!(session.current_score(), 0);
            assert_eq!(session.registry().list_active().len(), 9);
        });
    });
}

#[test]
fn round_scores_hits_and_resets_on_expiry() {
    let fixture = RoundFixture::bootstrap();

    run_serial(&rspec::given(
        "a 30 second round with nine idle robots",
        fixture,
        |scenario: &mut Scenario<RoundFixture>| {
            describe_hit(scenario);
            describe_expiry(scenario);
            describe_miss(scenario);
        },
    ));
}
