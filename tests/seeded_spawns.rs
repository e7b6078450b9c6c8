//! Spawn delays are reproducible from a seed.

use rstest::rstest;
use whackabot::{GameSession, GameSettings, Millis};

fn wake_times(seed: u64, start: Millis) -> Vec<Millis> {
    let mut session = GameSession::new(GameSettings {
        seed: Some(seed),
        ..GameSettings::default()
    });
    session.play(start);
    session
        .registry()
        .robots()
        .iter()
        .map(|robot| robot.fire_at().expect("hidden robots have a wake time") - start)
        .collect()
}

#[rstest]
#[case(0)]
#[case(17)]
#[case(u64::MAX)]
fn same_seed_same_schedule(#[case] seed: u64) {
    assert_eq!(wake_times(seed, 0), wake_times(seed, 0));
    assert_eq!(wake_times(seed, 0), wake_times(seed, 5_000));
}

#[test]
fn delays_fall_in_configured_range() {
    let settings = GameSettings::default();
    for delay in wake_times(3, 0) {
        assert!(
            (settings.spawn_delay_ms.min_ms..settings.spawn_delay_ms.max_ms).contains(&delay),
            "delay {delay} out of range"
        );
    }
}

#[test]
fn robots_wake_one_by_one() {
    let mut session = GameSession::new(GameSettings {
        seed: Some(11),
        ..GameSettings::default()
    });
    session.play(0);
    let mut schedule = wake_times(11, 0);
    schedule.sort_unstable();

    let first = schedule[0];
    session.tick(first).expect("tick");
    let awake = schedule.iter().filter(|&&at| at <= first).count();
    assert_eq!(session.registry().list_active().len(), awake);

    session.tick(schedule[8]).expect("tick");
    assert_eq!(session.registry().list_active().len(), 9);
}
