use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};

use gesture_overlay::{
    app::App,
    database::{builtin_gestures, load_gesture_database},
    pipeline::MalformedNamePolicy,
    sim, sink,
};

/// Body tracking and gesture overlay demo against the simulated sensor.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Gesture database file (one `discrete <name>` / `continuous <name>` per
    /// line). Uses a built-in sample set when omitted.
    #[arg(long)]
    gestures: Option<PathBuf>,
    /// Directory to write overlay captures into.
    #[arg(long, default_value = "captures")]
    output_root: PathBuf,
    /// Stop after this many frames (runs until Ctrl-C when omitted).
    #[arg(long)]
    max_frames: Option<u64>,
    /// Pipeline tick rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Write one capture out of every N rendered frames.
    #[arg(long, default_value_t = 30)]
    capture_stride: u64,
    /// What to do with a gesture whose name is all padding.
    #[arg(long, value_enum, default_value_t = NamePolicy::Skip)]
    malformed_names: NamePolicy,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum NamePolicy {
    Skip,
    Fatal,
}

impl From<NamePolicy> for MalformedNamePolicy {
    fn from(policy: NamePolicy) -> Self {
        match policy {
            NamePolicy::Skip => MalformedNamePolicy::Skip,
            NamePolicy::Fatal => MalformedNamePolicy::Fatal,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let gestures = match &args.gestures {
        Some(path) => load_gesture_database(path)?,
        None => builtin_gestures(),
    };
    log::info!("loaded {} gesture definitions", gestures.len());
    for gesture in &gestures {
        log::debug!("gesture {:?} ({:?})", gesture.trimmed_name(), gesture.kind);
    }

    let (color_reader, body_reader, gesture_readers, mapper) = sim::build_sim(&gestures);
    let mut app = App::new(
        color_reader,
        body_reader,
        gesture_readers,
        mapper,
        gestures,
        args.malformed_names.into(),
    );

    let capture_sink = sink::start_frame_sink(args.output_root.clone(), args.capture_stride)?;
    log::info!(
        "running at {} fps, captures under {}",
        args.fps,
        args.output_root.display()
    );

    let tick = Duration::from_secs(1) / args.fps.max(1);
    let mut frames: u64 = 0;

    loop {
        let started = Instant::now();

        if let Err(err) = app.update() {
            log::error!("sensor failure, shutting down: {err}");
            capture_sink.stop();
            return Err(err.into());
        }

        for reading in app.readings() {
            log::info!("{}", reading.display_text());
        }

        capture_sink.submit(app.render());

        frames += 1;
        if let Some(max) = args.max_frames {
            if frames >= max {
                break;
            }
        }

        if let Some(rest) = tick.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    log::info!("done after {frames} frames");
    capture_sink.stop();
    Ok(())
}
