//! Logger set-up for the game binary and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Default filter: the game at `info` (`debug` when verbose), everything
/// else at `warn`.
#[must_use]
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    format!(
        "warn,{}={}",
        env!("CARGO_CRATE_NAME"),
        level.as_str().to_ascii_lowercase()
    )
}

/// Initializes the global logger.
///
/// `RUST_LOG` overrides the default filter from [`default_filter`].
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // A logger installed by an earlier call or another test stays in place.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_game_level_only() {
        assert_eq!(default_filter(false), "warn,whackabot=info");
        assert_eq!(default_filter(true), "warn,whackabot=debug");
    }

    #[test]
    fn init_is_idempotent() {
        init(false);
        init(true);
    }
}
