use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Invalid dataset name '{0}'. Expected 'system@replica:window' (e.g., 'WT@1:25')."
    )]
    InvalidDatasetNameFormat(String),

    #[error("Window in dataset name '{name}' must be a positive integer, got '{value}'.")]
    InvalidWindow { name: String, value: String },

    #[error("Component '{component}' cannot be empty in dataset name '{name}'.")]
    EmptyComponent {
        component: &'static str,
        name: String,
    },
}

/// Logical name of a stored dataset: `system@replica:window`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetName {
    pub system: String,
    pub replica: String,
    pub window: usize,
}

impl DatasetName {
    /// Location relative to the data root: `<system>/Rep_<replica>/dccm_data_<window>.bin`.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.system)
            .join(format!("Rep_{}", self.replica))
            .join(dccmview::workflows::compute::output_file_name(self.window))
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.system, self.replica, self.window)
    }
}

impl FromStr for DatasetName {
    type Err = ParseError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let (system, rest) = name
            .split_once('@')
            .ok_or_else(|| ParseError::InvalidDatasetNameFormat(name.to_string()))?;
        let (replica, window) = rest
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidDatasetNameFormat(name.to_string()))?;

        for (component, value) in [("system", system), ("replica", replica), ("window", window)] {
            if value.trim().is_empty() {
                return Err(ParseError::EmptyComponent {
                    component,
                    name: name.to_string(),
                });
            }
        }

        let window = match window.trim().parse::<usize>() {
            Ok(w) if w > 0 => w,
            _ => {
                return Err(ParseError::InvalidWindow {
                    name: name.to_string(),
                    value: window.to_string(),
                });
            }
        };

        Ok(Self {
            system: system.trim().to_string(),
            replica: replica.trim().to_string(),
            window,
        })
    }
}

/// Whether `value` should be treated as a filesystem path rather than a logical name.
pub fn looks_like_path(value: &str) -> bool {
    value.contains(['/', '\\']) || value.ends_with(".bin") || !value.contains('@')
}
