use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "DCCM Viewer Developers",
    version,
    about = "dccm - inspect, compute and extract dynamic cross-correlation matrices of molecular dynamics trajectories.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the header and per-slice statistics of a DCCM dataset.
    Inspect(InspectArgs),
    /// Threshold a dataset and export the resulting point geometry as CSV.
    Extract(ExtractArgs),
    /// Compute DCCM datasets from a multi-frame XYZ trajectory.
    Compute(ComputeArgs),
    /// Manage the local data directory holding computed datasets.
    Data(DataArgs),
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Dataset to inspect: a path or a logical name (e.g., 'WT@1:25').
    #[arg(required = true, value_name = "NAME_OR_PATH")]
    pub input: String,

    /// Print min/max/mean for every slice.
    #[arg(long)]
    pub slices: bool,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Dataset to extract from: a path or a logical name (e.g., 'WT@1:25').
    #[arg(short, long, required = true, value_name = "NAME_OR_PATH")]
    pub input: String,

    /// Path for the CSV point export.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Magnitude of the negative threshold; values in (-X, 0) are dropped.
    #[arg(long, value_name = "FLOAT")]
    pub negative: Option<f64>,

    /// Positive threshold; values in [0, Y) are dropped.
    #[arg(long, value_name = "FLOAT")]
    pub positive: Option<f64>,

    /// Slice to emphasize, or -1 for all slices.
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub slice: Option<i32>,

    /// Override `selection.display-unselected` from the config file.
    #[command(flatten)]
    pub unselected: UnselectedVisibility,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S thresholds.positive=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive flags controlling whether unselected slices are exported.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct UnselectedVisibility {
    /// Export unselected slices with the small point size.
    #[arg(long)]
    pub show_unselected: bool,
    /// Skip unselected slices entirely.
    #[arg(long)]
    pub hide_unselected: bool,
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    /// Path to the input multi-frame XYZ trajectory.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives one `dccm_data_<window>.bin` per window size.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Window size in frames. Can be used multiple times.
    /// Defaults to 25, 50, 100, 200, 400, 800 and 1600.
    #[arg(short, long = "window", value_name = "FRAMES")]
    pub windows: Vec<usize>,

    /// Skip superposition of the frames onto the reference frame.
    #[arg(long)]
    pub no_align: bool,

    /// Frame used as the superposition reference.
    #[arg(long, value_name = "INT")]
    pub reference_frame: Option<usize>,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The new path to look up datasets in.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
    /// List the datasets stored in the data directory by logical name.
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn extract_accepts_negative_slice_and_repeated_sets() {
        let cli = Cli::try_parse_from([
            "dccm", "extract", "-i", "WT@1:25", "-o", "out.csv", "--slice", "-1", "-S",
            "thresholds.positive=0.5", "-S", "layout.step-length=0.1",
        ])
        .unwrap();
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.slice, Some(-1));
        assert_eq!(args.set_values.len(), 2);
    }

    #[test]
    fn show_and_hide_unselected_conflict() {
        let result = Cli::try_parse_from([
            "dccm",
            "extract",
            "-i",
            "a.bin",
            "-o",
            "b.csv",
            "--show-unselected",
            "--hide-unselected",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn compute_collects_windows() {
        let cli = Cli::try_parse_from([
            "dccm", "compute", "-i", "traj.xyz", "-o", "out", "-w", "25", "-w", "50",
        ])
        .unwrap();
        let Commands::Compute(args) = cli.command else {
            panic!("expected compute");
        };
        assert_eq!(args.windows, vec![25, 50]);
        assert!(!args.no_align);
    }
}
