use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Where inputs live and charts land, all relative to the asset root.
#[derive(Debug, Deserialize)]
pub struct AssetsConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,
    #[serde(default = "default_chart_dir")]
    pub chart_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_power_threshold")]
    pub power_threshold: f32,
    #[serde(default = "default_clarity_threshold")]
    pub clarity_threshold: f32,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            audio_dir: default_audio_dir(),
            chart_dir: default_chart_dir(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            power_threshold: default_power_threshold(),
            clarity_threshold: default_clarity_threshold(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("assets")
}
fn default_audio_dir() -> String {
    "mp3".into()
}
fn default_chart_dir() -> String {
    "songdata".into()
}
fn default_power_threshold() -> f32 {
    5.0
}
fn default_clarity_threshold() -> f32 {
    0.7
}

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
