//! Rockfall entry point
//!
//! Headless driver: loads settings and saved progress, then lets the
//! autopilot play a session for a fixed number of ticks.
//!
//! Usage: `rockfall [--ticks N] [--seed S] [--data-dir DIR] [--quality low|medium|high]`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use rockfall::audio::{AudioManager, LogAudio};
use rockfall::persistence::DataDir;
use rockfall::platform::{InputLatch, KeyState};
use rockfall::{Game, QualityPreset, Settings};

const DEFAULT_TICKS: u64 = 60 * 60;

#[derive(Debug, Default)]
struct Args {
    ticks: Option<u64>,
    seed: Option<u64>,
    data_dir: Option<PathBuf>,
    quality: Option<QualityPreset>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().ok_or_else(|| format!("{} needs a value", flag));
        match flag.as_str() {
            "--ticks" => {
                let v = value()?;
                args.ticks = Some(v.parse().map_err(|_| format!("bad tick count: {}", v))?);
            }
            "--seed" => {
                let v = value()?;
                args.seed = Some(v.parse().map_err(|_| format!("bad seed: {}", v))?);
            }
            "--data-dir" => args.data_dir = Some(PathBuf::from(value()?)),
            "--quality" => {
                let v = value()?;
                args.quality =
                    Some(QualityPreset::parse(&v).ok_or_else(|| format!("bad quality: {}", v))?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: rockfall [--ticks N] [--seed S] [--data-dir DIR] [--quality low|medium|high]");
            return ExitCode::from(2);
        }
    };

    let config_dir = args.data_dir.map(DataDir::new).unwrap_or_default();
    let settings_path = config_dir.settings_path();
    let mut settings = Settings::load(&settings_path);
    if !settings_path.exists() {
        // Leave an editable copy of the defaults behind
        if let Err(e) = settings.save(&settings_path) {
            log::warn!("Could not write default settings: {}", e);
        }
    }
    let data = settings
        .data_dir
        .clone()
        .map(DataDir::new)
        .unwrap_or_else(|| config_dir.clone());
    if let Some(quality) = args.quality {
        settings.quality = quality;
    }
    let seed = args.seed.or(settings.seed).unwrap_or_else(seed_from_clock);
    let ticks = args.ticks.unwrap_or(DEFAULT_TICKS);

    log::info!(
        "Rockfall (headless) starting: seed {}, {} ticks, quality {}, data in {}",
        seed,
        ticks,
        settings.quality.as_str(),
        data.root().display()
    );

    let audio = AudioManager::new(Box::new(LogAudio));
    let mut game = Game::new(seed, &settings, data, audio);

    let mut latch = InputLatch::new(true);
    let keys = KeyState::default();
    let mut ran = 0;
    while ran < ticks && game.is_running() {
        game.step(&latch.sample(&keys));
        ran += 1;
    }

    let snap = game.snapshot();
    println!(
        "{} ticks: phase {:?}, level {}, run score {}, coins {}, best {} (combo {})",
        ran,
        snap.phase,
        snap.hud.level,
        snap.hud.run_score,
        snap.hud.coins,
        snap.hud.high_score,
        game.state().records.max_combo,
    );
    ExitCode::SUCCESS
}
