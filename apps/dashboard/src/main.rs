use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    thread,
};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, LoadState, Settings};
use crossbeam_channel::bounded;
use shared::domain::{ActiveView, LocationId};
use tracing_subscriber::EnvFilter;

use backend_bridge::{commands::BackendCommand, runtime};
use controller::{
    events::UiEvent,
    orchestration::{dispatch_backend_command, parse_input, InputAction},
};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Terminal air-quality dashboard")]
struct Args {
    /// Settings file; defaults to ./dashboard.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Location loaded on start, overriding the configured default.
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Load the start location once, print one view and exit.
    Once {
        #[arg(long, default_value_t = ActiveView::Dashboard)]
        view: ActiveView,
        /// Print the settled snapshot as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Interactive session reading commands from stdin.
    Watch,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.api_base_url {
        settings.api_base_url = url;
    }
    if let Some(location) = args.location {
        settings.default_location = location;
    }

    match args.mode.unwrap_or(Mode::Watch) {
        Mode::Once { view, json } => run_once(settings, view, json),
        Mode::Watch => run_watch(settings),
    }
}

fn run_once(settings: Settings, view: ActiveView, json: bool) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;

    let snapshot = rt.block_on(async {
        let session = runtime::start_session(&settings).await?;
        session.select_view(view).await;
        anyhow::Ok(session.wait_until_ready().await)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", ui::render::render_snapshot(&snapshot));
    }
    Ok(())
}

fn run_watch(settings: Settings) -> Result<()> {
    let presets: Vec<LocationId> = settings.preset_locations();
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);

    let backend = runtime::launch(settings, cmd_rx, ui_tx);

    let printer = thread::spawn(move || {
        let stdout = io::stdout();
        while let Ok(event) = ui_rx.recv() {
            let mut out = stdout.lock();
            let _ = match event {
                UiEvent::Info(message) => writeln!(out, "{message}"),
                UiEvent::Error(message) => writeln!(out, "error: {message}"),
                UiEvent::Loading { location, .. } => {
                    writeln!(out, "Loading air quality data for {location}...")
                }
                UiEvent::SnapshotUpdated(snapshot) => {
                    if snapshot.load_state == LoadState::Loading && snapshot.reading.is_none() {
                        continue;
                    }
                    write!(out, "\n{}", ui::render::render_snapshot(&snapshot))
                }
                UiEvent::Stopped => break,
            };
            let _ = out.flush();
        }
    });

    println!("{}", ui::render::help_text(&presets));

    let mut status = String::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        match parse_input(&line, &presets) {
            InputAction::Command(cmd) => {
                dispatch_backend_command(&cmd_tx, cmd, &mut status);
                if !status.is_empty() {
                    eprintln!("{status}");
                    status.clear();
                }
            }
            InputAction::Help => println!("{}", ui::render::help_text(&presets)),
            InputAction::Invalid(message) => eprintln!("{message}"),
            InputAction::Ignore => {}
            InputAction::Quit => break,
        }
        if backend.is_finished() {
            break;
        }
    }

    dispatch_backend_command(&cmd_tx, BackendCommand::Shutdown, &mut status);
    drop(cmd_tx);
    let _ = backend.join();
    let _ = printer.join();
    Ok(())
}
