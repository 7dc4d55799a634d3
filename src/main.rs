//! bodytrack demo — runs the engine against a scripted synthetic feed and
//! logs every dispatched event.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;

use bodytrack::feed::synthetic::{ScriptStep, SyntheticFeed};
use bodytrack::{
    CalibrationStatus, EngineConfig, HandGestureKind, JointKind, JointReading, MotionEngine,
    SkeletonReading, SubjectData,
};

#[derive(Parser, Debug)]
#[command(name = "bodytrack", about = "Skeletal-tracking event engine demo")]
struct Cli {
    /// Exit after N seconds
    #[arg(long)]
    exit_after: Option<u64>,

    /// Replay the scripted scenario in a loop
    #[arg(long)]
    cycle: bool,

    /// Milliseconds between synthetic frames
    #[arg(long, default_value_t = 33)]
    frame_interval_ms: u64,

    /// Maximum concurrently tracked subjects
    #[arg(long, default_value_t = 1)]
    max_subjects: usize,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

/// Global flag set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// A scripted session: a subject appears, calibrates, sweeps a hand left,
/// and waves.
fn demo_scenario() -> Vec<ScriptStep> {
    let tracked = |x: f32| {
        let mut reading = SkeletonReading::uniform(JointReading {
            position: [0.0, 0.0, 2000.0],
            confidence: 0.9,
            ..JointReading::default()
        });
        reading.set(
            JointKind::RightShoulder,
            JointReading {
                position: [-200.0, 400.0, 2000.0],
                confidence: 0.9,
                ..JointReading::default()
            },
        );
        reading.set(
            JointKind::RightElbow,
            JointReading {
                position: [x / 2.0, 200.0, 2000.0],
                confidence: 0.9,
                ..JointReading::default()
            },
        );
        reading.set(
            JointKind::RightHand,
            JointReading {
                position: [x, 0.0, 2000.0],
                confidence: 0.9,
                ..JointReading::default()
            },
        );
        SubjectData {
            is_visible: true,
            calibration: CalibrationStatus::Tracked,
            skeleton: Some(reading),
            ..SubjectData::new(0)
        }
    };

    let mut steps = vec![
        // Appear and calibrate.
        ScriptStep::new().with_subject(SubjectData {
            is_new: true,
            is_visible: true,
            ..SubjectData::new(0)
        }),
        ScriptStep::new().with_subject(SubjectData {
            is_visible: true,
            calibration: CalibrationStatus::Calibrating,
            ..SubjectData::new(0)
        }),
    ];

    // Right hand sweeps left across several tracked frames.
    for step in 0..6 {
        steps.push(ScriptStep::new().with_subject(tracked(300.0 - 120.0 * step as f32)));
    }

    // The feed's own detector completes a wave.
    steps.push(ScriptStep::new().with_gesture(HandGestureKind::Wave, true));
    steps
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("bodytrack {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bodytrack=info".into()),
        )
        .init();

    info!("bodytrack v{} starting", env!("CARGO_PKG_VERSION"));

    let mut feed = SyntheticFeed::new(demo_scenario())
        .with_frame_interval(cli.frame_interval_ms)
        .with_pacing(cli.frame_interval_ms);
    if cli.cycle {
        feed = feed.cycling();
    }

    let config = EngineConfig {
        max_subjects: cli.max_subjects,
        ..EngineConfig::default()
    };
    let (mut engine, mut pump) = match MotionEngine::initialize(feed, config) {
        Ok(started) => started,
        Err(err) => {
            // Startup failure is reported once as a device error signal.
            info!("event: DEVICE_ERROR");
            return Err(err.into());
        }
    };

    install_signal_handlers();

    let start = Instant::now();
    let exit_duration = cli.exit_after.map(Duration::from_secs);
    let poll = Duration::from_millis(100);

    let mut handler = |event: bodytrack::Event| {
        info!("event: {}", event.as_str());
    };

    let mut open = true;
    while open {
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("shutdown signal received, exiting");
            break;
        }
        if let Some(dur) = exit_duration {
            if start.elapsed() >= dur {
                info!("exit timer fired after {}s", dur.as_secs());
                break;
            }
        }
        open = pump.dispatch(Some(poll), &mut handler)?;
    }

    let joints = engine.joints(&["right_hand", "torso"]);
    for (name, snapshot) in &joints {
        info!(
            "final {}: ({}, {}, {}) active={} extended={:?}",
            name, snapshot.x, snapshot.y, snapshot.z, snapshot.active, snapshot.percent_extended
        );
    }

    engine.close();

    // Drain whatever the worker published before it observed the stop flag.
    while pump.dispatch(Some(poll), &mut handler)? {}

    info!("bodytrack shut down");
    Ok(())
}
