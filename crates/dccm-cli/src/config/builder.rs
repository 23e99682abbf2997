use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{ComputeAppConfig, ExtractAppConfig};
use crate::cli::{ComputeArgs, ExtractArgs};
use crate::error::{CliError, Result};
use dccmview::engine::config::{ComputeConfigBuilder, RenderConfigBuilder, SliceLayout};
use nalgebra::Point3;
use std::str::FromStr;

pub fn build_extract_config(args: &ExtractArgs) -> Result<ExtractAppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let thresholds_file = file_config.thresholds.take().unwrap_or_default();
    let negative = args
        .negative
        .or(thresholds_file.negative)
        .unwrap_or(defaults.negative_threshold);
    let positive = args
        .positive
        .or(thresholds_file.positive)
        .unwrap_or(defaults.positive_threshold);

    let selection_file = file_config.selection.take().unwrap_or_default();
    let selected_slice = args
        .slice
        .or(selection_file.selected_slice)
        .unwrap_or(defaults.selected_slice);
    let display_unselected = match (args.unselected.show_unselected, args.unselected.hide_unselected)
    {
        (true, false) => true,
        (false, true) => false,
        _ => selection_file
            .display_unselected
            .unwrap_or(defaults.display_unselected),
    };

    let layout_file = file_config.layout.take().unwrap_or_default();
    let layout = SliceLayout {
        origin: layout_file
            .origin
            .map(Point3::from)
            .unwrap_or(defaults.layout.origin),
        slice_spacing: layout_file
            .slice_spacing
            .unwrap_or(defaults.layout.slice_spacing),
        step_length: layout_file
            .step_length
            .unwrap_or(defaults.layout.step_length),
        selected_point_size: layout_file
            .selected_point_size
            .unwrap_or(defaults.layout.selected_point_size),
        unselected_point_size: layout_file
            .unselected_point_size
            .unwrap_or(defaults.layout.unselected_point_size),
    };

    let render = RenderConfigBuilder::new()
        .negative_threshold(negative)
        .positive_threshold(positive)
        .selected_slice(selected_slice)
        .display_unselected(display_unselected)
        .layout(layout)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ExtractAppConfig {
        input: args.input.clone(),
        output_path: args.output.clone(),
        render,
    })
}

pub fn build_compute_config(args: &ComputeArgs) -> Result<ComputeAppConfig> {
    let defaults = DefaultsConfig::default();

    let windows = if args.windows.is_empty() {
        defaults.windows
    } else {
        args.windows.clone()
    };

    let core_config = ComputeConfigBuilder::new()
        .windows(windows)
        .align(!args.no_align && defaults.align)
        .reference_frame(args.reference_frame.unwrap_or(defaults.reference_frame))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ComputeAppConfig {
        input_path: args.input.clone(),
        output_dir: args.output.clone(),
        core_config,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "thresholds.negative" => {
                config
                    .thresholds
                    .get_or_insert_with(Default::default)
                    .negative = Some(parse_value(key, value_str, "float")?);
            }
            "thresholds.positive" => {
                config
                    .thresholds
                    .get_or_insert_with(Default::default)
                    .positive = Some(parse_value(key, value_str, "float")?);
            }
            "selection.selected-slice" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .selected_slice = Some(parse_value(key, value_str, "integer")?);
            }
            "selection.display-unselected" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .display_unselected = Some(parse_value(key, value_str, "boolean")?);
            }
            "layout.origin" => {
                config.layout.get_or_insert_with(Default::default).origin =
                    Some(parse_origin(key, value_str)?);
            }
            "layout.slice-spacing" => {
                config
                    .layout
                    .get_or_insert_with(Default::default)
                    .slice_spacing = Some(parse_value(key, value_str, "float")?);
            }
            "layout.step-length" => {
                config
                    .layout
                    .get_or_insert_with(Default::default)
                    .step_length = Some(parse_value(key, value_str, "float")?);
            }
            "layout.selected-point-size" => {
                config
                    .layout
                    .get_or_insert_with(Default::default)
                    .selected_point_size = Some(parse_value(key, value_str, "float")?);
            }
            "layout.unselected-point-size" => {
                config
                    .layout
                    .get_or_insert_with(Default::default)
                    .unselected_point_size = Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

/// Parses `x,y,z`.
fn parse_origin(key: &str, value_str: &str) -> Result<[f64; 3]> {
    let parts = value_str
        .split(',')
        .map(|p| parse_value::<f64>(key, p, "float"))
        .collect::<Result<Vec<_>>>()?;
    <[f64; 3]>::try_from(parts).map_err(|_| {
        CliError::Config(format!(
            "Invalid value for {}: '{}'. Expected three comma-separated floats.",
            key, value_str
        ))
    })
}
