//! Proving Grounds - terminal runner.

use std::io;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use provinggrounds_engine::config::EngineConfig;
use provinggrounds_engine::render::{AsciiRenderer, RenderSurface};
use provinggrounds_engine::runtime::{parse_command, Command};
use provinggrounds_engine::App;
use provinggrounds_shared::FrameSnapshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (cargo run may start us from `crates/engine`).
    load_dotenv_from_repo_root();

    // Logs go to stderr; stdout carries the frame
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "provinggrounds_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = EngineConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        scoring_url = %config.scoring.base_url,
        task = %config.scoring.task,
        "Starting Proving Grounds"
    );

    let app = App::new(config);
    let (runtime, handle) = app.start_session();
    let game = tokio::spawn(runtime.run());
    let renderer = tokio::spawn(render_frames(handle.frames()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let Some(command) = parse_command(&line) else {
            continue;
        };
        if handle.send(command).await.is_err() || command == Command::Quit {
            break;
        }
    }

    // Closing the handle ends the run if input ran out before Quit
    drop(handle);
    let session = game.await.context("Game runtime panicked")?;
    renderer
        .await
        .context("Renderer panicked")?
        .context("Failed to draw frame")?;

    println!(
        "Wisdom collected: {}/{}",
        session.inventory().len(),
        app.catalog.required_token_count()
    );
    if let Some(result) = session.optimization().result() {
        println!("Final score: {}%", result.score);
    }
    Ok(())
}

/// Draws every published frame until the runtime stops.
async fn render_frames(mut frames: watch::Receiver<FrameSnapshot>) -> io::Result<()> {
    let mut renderer = AsciiRenderer::new(io::stdout());
    loop {
        let frame = frames.borrow_and_update().clone();
        renderer.render(&frame)?;
        if frames.changed().await.is_err() {
            return Ok(());
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
