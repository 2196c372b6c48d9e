use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub data: DataSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    /// Directory holding `<log id>.csv` files
    pub log_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisSettings {
    /// Aggregate cycles on worker tasks
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_stream_channel_capacity")]
    pub stream_channel_capacity: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            parallel: false,
            stream_channel_capacity: default_stream_channel_capacity(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_stream_channel_capacity() -> usize {
    100
}

/// Load `config/analyzer.*`, with `CYCLER_SECTION__KEY` environment overrides.
pub fn load_analyzer_config() -> anyhow::Result<AnalyzerConfig> {
    load_from("config/analyzer")
}

pub fn load_from(path: &str) -> anyhow::Result<AnalyzerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(
            config::Environment::with_prefix("CYCLER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
