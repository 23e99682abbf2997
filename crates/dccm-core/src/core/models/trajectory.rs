use nalgebra::Point3;

/// Coordinates of a fixed set of atoms over successive frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    atom_names: Vec<String>,
    frames: Vec<Vec<Point3<f64>>>,
}

impl Trajectory {
    pub fn new(atom_names: Vec<String>) -> Self {
        Self {
            atom_names,
            frames: Vec::new(),
        }
    }

    /// Appends a frame, returning it back if its atom count does not match.
    pub fn push_frame(&mut self, frame: Vec<Point3<f64>>) -> Result<(), Vec<Point3<f64>>> {
        if frame.len() != self.atom_names.len() {
            return Err(frame);
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn atom_names(&self) -> &[String] {
        &self.atom_names
    }

    pub fn num_atoms(&self) -> usize {
        self.atom_names.len()
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Vec<Point3<f64>>] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [Vec<Point3<f64>>] {
        &mut self.frames
    }

    /// Consecutive non-overlapping windows of `window` frames.
    ///
    /// Trailing frames that do not fill a whole window are dropped. A `window` of zero
    /// yields no windows.
    pub fn windows(&self, window: usize) -> impl Iterator<Item = &[Vec<Point3<f64>>]> {
        let usable = if window == 0 { 0 } else { self.frames.len() / window * window };
        self.frames[..usable].chunks_exact(window.max(1))
    }
}
