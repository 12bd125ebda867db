mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use notefall::analysis;
use notefall::analysis::pitch::PitchParams;
use notefall::audio;
use notefall::chart::store;
use notefall::chart::synth::{self, Difficulty};
use notefall::chart::Chart;
use notefall::config;
use notefall::ChartError;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect notefall.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("notefall.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("notefall").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });

    let cfg = match config_path {
        Some(ref path) => match config::load_config(path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                config::Config::default()
            }
        },
        None => config::Config::default(),
    };

    let difficulty: Difficulty = cli
        .difficulty
        .parse()
        .with_context(|| format!("Invalid --difficulty {:?}", cli.difficulty))?;

    let asset_root = cli.asset_root.unwrap_or_else(|| cfg.assets.root.clone());
    let input = asset_root.join(&cfg.assets.audio_dir).join(&cli.input);
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let output = cli.output.unwrap_or_else(|| {
        let stem = input
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "chart".into());
        asset_root
            .join(&cfg.assets.chart_dir)
            .join(stem)
            .with_extension("json")
    });

    log::info!("notefall - song chart generator");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", output.display());
    log::info!("Difficulty: {:?}", difficulty);

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio_data = audio::decode_audio(&input)?;

    // 2. Song tags (best-effort, never fatal)
    let metadata = audio::extract_metadata(&input);

    // 3. Beat and pitch analysis over the shared buffer
    log::info!("Analyzing audio...");
    let params = PitchParams {
        power_threshold: cfg.analysis.power_threshold,
        clarity_threshold: cfg.analysis.clarity_threshold,
    };
    let analysis = analysis::analyze(&audio_data, &params);

    if analysis.bpm == 0 {
        return Err(ChartError::DegenerateInput(
            "fewer than 2 beats detected; tempo is undefined".into(),
        )
        .into());
    }

    // 4. Merge into notes and downsample for the requested difficulty
    let notes = synth::synthesize(&analysis.beats, &analysis.pitches, analysis.bpm)?;
    let notes = synth::filter_by_difficulty(&notes, difficulty);
    log::info!("Chart notes after difficulty filter: {}", notes.len());

    // 5. Persist. The chart is complete in memory before anything is written.
    let chart = Chart::new(audio_data.duration, analysis.bpm, notes, metadata);
    store::save(&chart, &output)?;

    log::info!("Done! Chart: {}", output.display());
    Ok(())
}
