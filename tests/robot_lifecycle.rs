//! Struck robots die, leave the scene and come back idle at home.

use approx::assert_relative_eq;
use rstest::rstest;
use test_utils::picking::{centre_click, hits_on};
use test_utils::session::{bob_peak, fixed_settings, idle_session, state_of, WAKE_MS};
use whackabot::{ClickOutcome, GameSession, RobotId, RobotState};

fn strike_all(session: &mut GameSession, robots: &[RobotId], now: u64) {
    for &robot in robots {
        let outcome = session
            .click_with(centre_click(), &hits_on(robot), now)
            .unwrap_or_else(|e| panic!("click failed: {e}"));
        assert_eq!(
            outcome,
            ClickOutcome::Scored {
                robot,
                score: session.current_score(),
            }
        );
    }
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(9)]
fn struck_robots_return_idle_at_home(#[case] count: usize) {
    let mut session = idle_session(fixed_settings());
    let now = bob_peak(&session, WAKE_MS);
    let targets: Vec<_> = session.registry().ids().into_iter().take(count).collect();
    strike_all(&mut session, &targets, now);
    assert_eq!(session.current_score(), 5 * u32::try_from(count).unwrap_or(u32::MAX));

    let settings = session.settings().clone();
    let back = now + settings.dying_ms + settings.respawn_delay_ms;
    session.tick(back - 1).expect("tick before respawn");
    for &robot in &targets {
        assert_eq!(state_of(&session, robot), RobotState::Removed);
    }
    assert_eq!(session.registry().list_active().len(), 9 - count);

    session.tick(back).expect("tick at respawn");
    assert_eq!(session.registry().list_active().len(), 9);
    for view in session.robot_views(back) {
        let home = session.registry().get(view.id).expect("robot").home();
        assert_eq!(view.state, RobotState::Idle);
        assert_relative_eq!(view.pose.pitch, 0.0);
        assert_relative_eq!(view.pose.translation.x, home.x);
        assert_relative_eq!(view.pose.translation.z, home.z);
    }
}

#[test]
fn one_late_tick_walks_every_overdue_edge() {
    let mut session = idle_session(fixed_settings());
    let now = bob_peak(&session, WAKE_MS);
    let robot = session.registry().ids()[0];
    strike_all(&mut session, &[robot], now);

    let settings = session.settings().clone();
    let report = session
        .tick(now + settings.dying_ms + settings.respawn_delay_ms + 10_000)
        .expect("late tick");
    let path: Vec<_> = report
        .transitions
        .iter()
        .filter(|transition| transition.robot == robot)
        .map(|transition| (transition.from, transition.to, transition.at))
        .collect();
    let removed_at = now + settings.dying_ms;
    let back_at = removed_at + settings.respawn_delay_ms;
    assert_eq!(
        path,
        vec![
            (RobotState::Dying, RobotState::Removed, removed_at),
            (RobotState::Removed, RobotState::Respawning, back_at),
            (RobotState::Respawning, RobotState::Idle, back_at),
        ]
    );
    assert_eq!(state_of(&session, robot), RobotState::Idle);
}

#[test]
fn a_robot_scores_once_per_life() {
    let mut session = idle_session(fixed_settings());
    let now = bob_peak(&session, WAKE_MS);
    let robot = session.registry().ids()[0];
    strike_all(&mut session, &[robot], now);

    let again = session
        .click_with(centre_click(), &hits_on(robot), now + 10)
        .expect("click");
    assert_eq!(again, ClickOutcome::Ignored { robot });
    assert_eq!(session.current_score(), 5);

    let settings = session.settings().clone();
    let back = now + settings.dying_ms + settings.respawn_delay_ms;
    session.tick(back).expect("tick at respawn");
    strike_all(&mut session, &[robot], back + 1);
    assert_eq!(session.current_score(), 10);
}

#[test]
fn dying_robot_spins_in_place() {
    let mut session = idle_session(fixed_settings());
    let now = bob_peak(&session, WAKE_MS);
    let robot = session.registry().ids()[0];
    let before = session.robot_views(now)[0].pose;
    strike_all(&mut session, &[robot], now);

    let half = now + session.settings().animation_ms / 2;
    let during = session.robot_views(half)[0].pose;
    assert_relative_eq!(during.translation.y, before.translation.y);
    assert!(during.pitch < 0.0, "robot should be tipping over");
}
