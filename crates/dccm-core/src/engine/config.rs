use super::view::PointEmphasis;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{name}' must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("Parameter '{name}' must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("Selected slice {0} is invalid; use -1 for all slices or a slice index")]
    InvalidSelection(i32),

    #[error("Window size must be at least one frame")]
    ZeroWindow,
}

/// The open exclusion band `(-negative, positive)`.
///
/// Both bounds are magnitudes in `[0, 1]`; values outside that range are clamped on
/// construction. A value is kept only if it is `<= -negative` or `>= positive`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSpec {
    negative: f64,
    positive: f64,
}

impl ThresholdSpec {
    pub const DEFAULT_NEGATIVE: f64 = 0.4;
    pub const DEFAULT_POSITIVE: f64 = 0.4;

    pub fn new(negative: f64, positive: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            negative: unit_interval("negative_threshold", negative)?,
            positive: unit_interval("positive_threshold", positive)?,
        })
    }

    pub fn negative(&self) -> f64 {
        self.negative
    }

    pub fn positive(&self) -> f64 {
        self.positive
    }

    #[inline]
    pub fn excludes(&self, value: f64) -> bool {
        value > -self.negative && value < self.positive
    }
}

impl Default for ThresholdSpec {
    fn default() -> Self {
        Self {
            negative: Self::DEFAULT_NEGATIVE,
            positive: Self::DEFAULT_POSITIVE,
        }
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_nan() {
        return Err(ConfigError::NotFinite { name, value });
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Which slices are emphasized and whether the others are drawn at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    selected_slice: i32,
    display_unselected: bool,
}

impl SelectionState {
    /// Sentinel selecting every slice.
    pub const ALL_SLICES: i32 = -1;

    pub fn new(selected_slice: i32, display_unselected: bool) -> Result<Self, ConfigError> {
        if selected_slice < Self::ALL_SLICES {
            return Err(ConfigError::InvalidSelection(selected_slice));
        }
        Ok(Self {
            selected_slice,
            display_unselected,
        })
    }

    pub fn selected_slice(&self) -> i32 {
        self.selected_slice
    }

    pub fn display_unselected(&self) -> bool {
        self.display_unselected
    }

    /// Resets the selection to [`Self::ALL_SLICES`] if it does not name one of
    /// `num_slices` slices.
    pub fn clamped_to(self, num_slices: usize) -> Self {
        let in_range = usize::try_from(self.selected_slice).map_or(true, |s| s < num_slices);
        if in_range {
            self
        } else {
            Self {
                selected_slice: Self::ALL_SLICES,
                ..self
            }
        }
    }

    /// How slice `slice_index` is drawn, or `None` if it is skipped entirely.
    pub fn emphasis_for(&self, slice_index: usize) -> Option<PointEmphasis> {
        let selected = self.selected_slice == Self::ALL_SLICES
            || usize::try_from(self.selected_slice).is_ok_and(|s| s == slice_index);
        if selected {
            Some(PointEmphasis::Selected)
        } else if self.display_unselected {
            Some(PointEmphasis::Unselected)
        } else {
            None
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected_slice: Self::ALL_SLICES,
            display_unselected: true,
        }
    }
}

/// Placement of the slice stack in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceLayout {
    pub origin: Point3<f64>,
    pub slice_spacing: f64,
    pub step_length: f64,
    pub selected_point_size: f64,
    pub unselected_point_size: f64,
}

impl SliceLayout {
    /// Origin of slice `slice_index`; slices are stacked towards negative z.
    pub fn origin_for(&self, slice_index: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x,
            self.origin.y,
            self.origin.z - slice_index as f64 * self.slice_spacing,
        )
    }

    pub fn point_size(&self, emphasis: PointEmphasis) -> f64 {
        match emphasis {
            PointEmphasis::Selected => self.selected_point_size,
            PointEmphasis::Unselected => self.unselected_point_size,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("origin.x", self.origin.x),
            ("origin.y", self.origin.y),
            ("origin.z", self.origin.z),
            ("slice_spacing", self.slice_spacing),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }
        for (name, value) in [
            ("step_length", self.step_length),
            ("selected_point_size", self.selected_point_size),
            ("unselected_point_size", self.unselected_point_size),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SliceLayout {
    fn default() -> Self {
        Self {
            origin: Point3::new(1.0, 0.05, -1.0),
            slice_spacing: 0.1,
            step_length: 0.09,
            selected_point_size: 0.16,
            unselected_point_size: 0.022,
        }
    }
}

/// Everything a rebuild depends on besides the dataset itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderConfig {
    pub thresholds: ThresholdSpec,
    pub selection: SelectionState,
    pub layout: SliceLayout,
}

#[derive(Default)]
pub struct RenderConfigBuilder {
    negative_threshold: Option<f64>,
    positive_threshold: Option<f64>,
    selected_slice: Option<i32>,
    display_unselected: Option<bool>,
    layout: Option<SliceLayout>,
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn negative_threshold(mut self, threshold: f64) -> Self {
        self.negative_threshold = Some(threshold);
        self
    }
    pub fn positive_threshold(mut self, threshold: f64) -> Self {
        self.positive_threshold = Some(threshold);
        self
    }
    pub fn selected_slice(mut self, slice: i32) -> Self {
        self.selected_slice = Some(slice);
        self
    }
    pub fn display_unselected(mut self, display: bool) -> Self {
        self.display_unselected = Some(display);
        self
    }
    pub fn layout(mut self, layout: SliceLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Thresholds are required; selection defaults to all slices with unselected
    /// slices shown, and the layout to [`SliceLayout::default`].
    pub fn build(self) -> Result<RenderConfig, ConfigError> {
        let thresholds = ThresholdSpec::new(
            self.negative_threshold
                .ok_or(ConfigError::MissingParameter("negative_threshold"))?,
            self.positive_threshold
                .ok_or(ConfigError::MissingParameter("positive_threshold"))?,
        )?;
        let selection = SelectionState::new(
            self.selected_slice.unwrap_or(SelectionState::ALL_SLICES),
            self.display_unselected.unwrap_or(true),
        )?;
        let layout = self.layout.unwrap_or_default();
        layout.validate()?;
        Ok(RenderConfig {
            thresholds,
            selection,
            layout,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputeConfig {
    pub windows: Vec<usize>,
    pub align: bool,
    pub reference_frame: usize,
}

#[derive(Default)]
pub struct ComputeConfigBuilder {
    windows: Vec<usize>,
    align: Option<bool>,
    reference_frame: Option<usize>,
}

impl ComputeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(mut self, frames: usize) -> Self {
        self.windows.push(frames);
        self
    }
    pub fn windows(mut self, frames: impl IntoIterator<Item = usize>) -> Self {
        self.windows.extend(frames);
        self
    }
    pub fn align(mut self, align: bool) -> Self {
        self.align = Some(align);
        self
    }
    pub fn reference_frame(mut self, frame: usize) -> Self {
        self.reference_frame = Some(frame);
        self
    }

    pub fn build(mut self) -> Result<ComputeConfig, ConfigError> {
        if self.windows.is_empty() {
            return Err(ConfigError::MissingParameter("windows"));
        }
        if self.windows.contains(&0) {
            return Err(ConfigError::ZeroWindow);
        }
        self.windows.sort_unstable();
        self.windows.dedup();
        Ok(ComputeConfig {
            windows: self.windows,
            align: self.align.unwrap_or(true),
            reference_frame: self.reference_frame.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_exclude_the_open_band_only() {
        let t = ThresholdSpec::new(0.4, 0.4).unwrap();
        assert!(t.excludes(0.39));
        assert!(!t.excludes(0.40));
        assert!(t.excludes(-0.39));
        assert!(!t.excludes(-0.40));
        assert!(t.excludes(0.0));
    }

    #[test]
    fn zero_thresholds_exclude_nothing() {
        let t = ThresholdSpec::new(0.0, 0.0).unwrap();
        assert!(!t.excludes(0.0));
        assert!(!t.excludes(-0.001));
        assert!(!t.excludes(0.001));
    }

    #[test]
    fn thresholds_are_clamped_to_unit_interval() {
        let t = ThresholdSpec::new(-0.5, 3.0).unwrap();
        assert_eq!(t.negative(), 0.0);
        assert_eq!(t.positive(), 1.0);
        assert!(matches!(
            ThresholdSpec::new(f64::NAN, 0.5),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn selection_is_reset_when_out_of_range() {
        let s = SelectionState::new(10, true).unwrap();
        assert_eq!(s.clamped_to(5).selected_slice(), -1);
        assert!(s.clamped_to(5).display_unselected());
        assert_eq!(s.clamped_to(11).selected_slice(), 10);
        assert_eq!(SelectionState::default().clamped_to(0).selected_slice(), -1);
        assert_eq!(
            SelectionState::new(-2, false),
            Err(ConfigError::InvalidSelection(-2))
        );
    }

    #[test]
    fn emphasis_follows_selection_and_visibility() {
        let all = SelectionState::default();
        assert_eq!(all.emphasis_for(3), Some(PointEmphasis::Selected));

        let one = SelectionState::new(2, true).unwrap();
        assert_eq!(one.emphasis_for(2), Some(PointEmphasis::Selected));
        assert_eq!(one.emphasis_for(1), Some(PointEmphasis::Unselected));

        let hidden = SelectionState::new(2, false).unwrap();
        assert_eq!(hidden.emphasis_for(1), None);
        assert_eq!(hidden.emphasis_for(2), Some(PointEmphasis::Selected));
    }

    #[test]
    fn layout_stacks_slices_along_negative_z() {
        let layout = SliceLayout::default();
        let origin = layout.origin_for(3);
        assert_eq!(origin.x, 1.0);
        assert_eq!(origin.y, 0.05);
        assert!((origin.z - -1.3).abs() < 1e-12);
        assert_eq!(layout.point_size(PointEmphasis::Selected), 0.16);
        assert_eq!(layout.point_size(PointEmphasis::Unselected), 0.022);
    }

    #[test]
    fn builder_requires_thresholds_and_validates_layout() {
        assert_eq!(
            RenderConfigBuilder::new().positive_threshold(0.4).build(),
            Err(ConfigError::MissingParameter("negative_threshold"))
        );

        let bad_layout = SliceLayout {
            step_length: 0.0,
            ..SliceLayout::default()
        };
        assert!(matches!(
            RenderConfigBuilder::new()
                .negative_threshold(0.4)
                .positive_threshold(0.4)
                .layout(bad_layout)
                .build(),
            Err(ConfigError::NotPositive {
                name: "step_length",
                ..
            })
        ));

        let config = RenderConfigBuilder::new()
            .negative_threshold(0.3)
            .positive_threshold(0.5)
            .selected_slice(1)
            .display_unselected(false)
            .build()
            .unwrap();
        assert_eq!(config.thresholds.negative(), 0.3);
        assert_eq!(config.selection.selected_slice(), 1);
        assert_eq!(config.layout, SliceLayout::default());
    }

    #[test]
    fn compute_builder_sorts_and_rejects_zero_windows() {
        let config = ComputeConfigBuilder::new()
            .windows([50, 25, 50])
            .build()
            .unwrap();
        assert_eq!(config.windows, vec![25, 50]);
        assert!(config.align);

        assert_eq!(
            ComputeConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("windows"))
        );
        assert_eq!(
            ComputeConfigBuilder::new().window(0).build(),
            Err(ConfigError::ZeroWindow)
        );
    }
}
