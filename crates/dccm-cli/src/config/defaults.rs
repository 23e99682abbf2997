use dccmview::engine::config::{SelectionState, SliceLayout, ThresholdSpec};

pub struct DefaultsConfig {
    pub negative_threshold: f64,
    pub positive_threshold: f64,
    pub selected_slice: i32,
    pub display_unselected: bool,
    pub layout: SliceLayout,
    pub windows: Vec<usize>,
    pub align: bool,
    pub reference_frame: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            negative_threshold: ThresholdSpec::DEFAULT_NEGATIVE,
            positive_threshold: ThresholdSpec::DEFAULT_POSITIVE,
            selected_slice: SelectionState::ALL_SLICES,
            display_unselected: true,
            layout: SliceLayout::default(),
            windows: vec![25, 50, 100, 200, 400, 800, 1600],
            align: true,
            reference_frame: 0,
        }
    }
}
