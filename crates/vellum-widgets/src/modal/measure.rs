#![forbid(unsafe_code)]

//! Content measurement reports.

/// Measured content box, in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Latest measurement of one piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measure {
    latest: Option<Bounds>,
}

impl Measure {
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: None }
    }

    /// Record a measurement. Returns `true` if it differs from the previous one.
    pub fn report(&mut self, bounds: Bounds) -> bool {
        let changed = self.latest != Some(bounds);
        self.latest = Some(bounds);
        changed
    }

    #[must_use]
    pub fn latest(&self) -> Option<Bounds> {
        self.latest
    }
}
