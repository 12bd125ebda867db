use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "notefall",
    about = "Turns a recorded song into a playable note chart"
)]
pub struct Cli {
    /// Source audio file (WAV, MP3, FLAC, OGG), resolved under the asset root
    pub input: PathBuf,

    /// Output chart file (default: <asset root>/songdata/<input stem>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Note density: easy, medium or hard
    #[arg(short, long, default_value = "easy")]
    pub difficulty: String,

    /// Asset root directory
    #[arg(long)]
    pub asset_root: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
