use anyhow::{Context, Result};
use clap::Parser;
use sign_hand::{
    ActuatorSink, DisplaySink, HandConfig, HandController, JointVector, LoopInputs, Profile,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// How long the loop waits for a line before running the timers anyway.
const IDLE_TICK: Duration = Duration::from_millis(50);

/// Drives the hand controller from stdin. `!mode` and `!reset` stand in for
/// the two buttons.
#[derive(Parser, Debug)]
#[command(name = "sign-hand", version)]
struct Args {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wiring profile, overriding the config file.
    #[arg(long, value_parser = parse_profile)]
    profile: Option<Profile>,
}

fn parse_profile(raw: &str) -> Result<Profile, String> {
    match raw {
        "seven_axis" | "7" => Ok(Profile::SevenAxis),
        "six_axis" | "6" => Ok(Profile::SixAxis),
        other => Err(format!("unknown profile {other:?}, expected seven_axis or six_axis")),
    }
}

struct StdoutActuator;

impl ActuatorSink for StdoutActuator {
    fn apply(&mut self, pose: &JointVector) {
        println!("POSE {pose}");
    }
}

struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn render(&mut self, lines: &[String]) {
        info!(target: "display", "{}", lines.join(" | "));
    }

    fn echo(&mut self, text: &str) {
        println!("MODE:{text}");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => HandConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => HandConfig::default(),
    };
    if let Some(profile) = args.profile {
        config.profile = profile;
    }

    let mut controller = HandController::new(config, StdoutActuator, LogDisplay)
        .context("invalid pose table")?;

    // Stdin blocks, so it is read on its own thread and the loop keeps
    // ticking while no line arrives.
    let (tx, rx) = mpsc::channel::<io::Result<String>>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let line = match rx.recv_timeout(IDLE_TICK) {
            Ok(line) => line.context("failed to read stdin")?,
            Err(RecvTimeoutError::Timeout) => {
                controller.poll(&LoopInputs::default(), Instant::now());
                io::stdout().flush().context("failed to flush stdout")?;
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let now = Instant::now();
        let mut inputs = LoopInputs::default();
        match line.trim() {
            "!mode" => inputs.mode_pressed = true,
            "!reset" => inputs.reset_pressed = true,
            _ => inputs.line = Some(line.as_str()),
        }
        controller.poll(&inputs, now);
        // Release the buttons so the next press is a fresh edge.
        controller.poll(&LoopInputs::default(), now);
        io::stdout().flush().context("failed to flush stdout")?;
    }

    Ok(())
}
