//! # Moon Tracker Application Entry Point
//!
//! This binary drives the moon engine on a periodic tick, merges in optional
//! feed overrides and renders the moon panel as ASCII. With `--once` it
//! renders a single panel and exits.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::Utc;
use log::{debug, info};
use moon_tracker_lib::config::Config;
use moon_tracker_lib::display::{merge, MoonReport};
use moon_tracker_lib::moon_feed::{self, OverrideFeed};
use moon_tracker_lib::renderer::draw_ascii;
use moon_tracker_lib::tracker::MoonTracker;
use std::env;

/// Command-line options
struct Args {
    once: bool,
    config: Option<String>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        once: false,
        config: None,
    };
    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--once" => args.once = true,
            "--config" => {
                args.config = Some(iter.next().context("--config needs a path")?);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

/// One tick: engine, overrides, render.
async fn render_tick(tracker: &mut MoonTracker, feed: &mut OverrideFeed, config: &Config) {
    let snapshot = tracker.tick(Utc::now());
    let computed = MoonReport::from_snapshot(&snapshot, tracker.offset());

    let overrides = feed.overrides().await;
    if !overrides.is_empty() {
        debug!("Applying feed overrides: {:?}", overrides);
    }

    let report = merge(computed, &overrides);
    draw_ascii(
        &config.observer.name,
        &report,
        &snapshot.progress,
        config.display.arc_width,
    );
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let mut tracker = MoonTracker::new(config.observer(), config.offset());
    let mut feed = OverrideFeed::new(config.feed.url.clone(), moon_feed::CACHE, config.feed_ttl());
    let observer = tracker.observer();
    info!(
        "Tracking the Moon from {} ({:.2}, {:.2}), UTC{}",
        config.observer.name,
        observer.latitude,
        observer.longitude,
        tracker.offset()
    );

    // Create Tokio runtime for the feed fetch and the tick timer
    let rt = tokio::runtime::Runtime::new().context("failed to start Tokio runtime")?;

    rt.block_on(async {
        if args.once {
            render_tick(&mut tracker, &mut feed, &config).await;
            return;
        }

        let mut interval = tokio::time::interval(config.refresh_interval());
        loop {
            interval.tick().await;
            render_tick(&mut tracker, &mut feed, &config).await;
        }
    });

    Ok(())
}
