use nalgebra::Point3;

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to `[0, 1]`, the layout expected by vertex color buffers.
    pub fn normalized(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

/// Hit-testing payload for a single emitted point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMeta {
    pub slice_index: usize,
    pub residue_i: usize,
    pub residue_j: usize,
    pub value: f64,
}

/// One correlation value that survived thresholding, placed and colored.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub slice_index: usize,
    pub residue_i: usize,
    pub residue_j: usize,
    pub value: f64,
    pub color: Rgb,
    pub position: Point3<f64>,
}

impl PointRecord {
    pub fn meta(&self) -> PointMeta {
        PointMeta {
            slice_index: self.slice_index,
            residue_i: self.residue_i,
            residue_j: self.residue_j,
            value: self.value,
        }
    }
}
