//! Linear volume level

/// Volume level clamped to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
}

impl Volume {
    /// Create a volume, clamping out-of-range input (NaN becomes full volume)
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level).unwrap_or(1.0),
        }
    }

    /// Clamp `level` into `[0, 1]`; `None` for NaN
    pub fn clamp(level: f32) -> Option<f32> {
        (!level.is_nan()).then(|| level.clamp(0.0, 1.0))
    }

    /// Set the level, returning the stored value
    ///
    /// NaN leaves the level unchanged.
    pub fn set(&mut self, level: f32) -> f32 {
        if let Some(level) = Self::clamp(level) {
            self.level = level;
        }
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self { level: 1.0 }
    }
}
