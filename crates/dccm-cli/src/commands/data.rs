use crate::cli::{DataArgs, DataCommands};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use std::path::PathBuf;
use tracing::info;

pub async fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => handle_path(),
        DataCommands::SetPath { path } => handle_set_path(path),
        DataCommands::ResetPath => handle_reset_path(),
        DataCommands::List => handle_list(),
    }
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    if !path.is_absolute() {
        return Err(CliError::Argument(format!(
            "Data path must be absolute: {}",
            path.display()
        )));
    }
    DataManager::set_custom_path(&path)?;
    info!("Data path set to {:?}", &path);
    println!("✓ Data path set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "✓ Data path reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}

fn handle_list() -> Result<()> {
    let manager = DataManager::new()?;
    let names = manager.list_datasets()?;
    if names.is_empty() {
        println!(
            "No datasets found under {}.",
            manager.get_data_path().display()
        );
        return Ok(());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
