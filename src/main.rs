//! Whackabot game binary: opens a window and runs the game.

use std::path::PathBuf;

use anyhow::Context;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;
use whackabot::{init_logging, GameSettings, PresentationPlugin, WhackPlugin};

/// A whack-a-robot arcade game
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON file with game settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for robot spawn delays
    #[arg(long)]
    seed: Option<u64>,

    /// Round length in seconds
    #[arg(long)]
    round_secs: Option<u64>,
}

fn load_settings(args: &Args) -> anyhow::Result<GameSettings> {
    let mut settings = match &args.config {
        Some(path) => GameSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => GameSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(secs) = args.round_secs {
        settings.round_ms = secs.saturating_mul(1_000);
    }
    settings.validate().context("validating settings")?;
    Ok(settings)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let settings = load_settings(&args)?;
    log::info!("starting with {settings:?}");

    let exit = App::new()
        .add_plugins(DefaultPlugins.build().disable::<LogPlugin>())
        .insert_resource(settings)
        .add_plugins((WhackPlugin, PresentationPlugin))
        .run();
    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("game exited with code {code}"),
    }
}
