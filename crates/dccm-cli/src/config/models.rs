use dccmview::engine::config::{ComputeConfig, RenderConfig};
use std::path::PathBuf;

pub struct ExtractAppConfig {
    pub input: String,
    pub output_path: PathBuf,
    pub render: RenderConfig,
}

pub struct ComputeAppConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub core_config: ComputeConfig,
}
