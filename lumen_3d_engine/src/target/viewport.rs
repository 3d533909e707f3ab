/// Viewport - origin and size of the drawable area of a render target
///
/// Integer, GL-convention rectangle (origin at the lower-left corner).
/// A freshly constructed render target starts with the zero viewport,
/// which is not drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Left edge in pixels
    pub x: i32,
    /// Bottom edge in pixels
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport covering `width` x `height` from the origin
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns true if both dimensions are strictly positive
    pub fn has_positive_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns true if the origin is not negative
    pub fn has_valid_origin(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }

    /// Returns true if `other` has the same width and height
    pub fn same_size(&self, other: &Viewport) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Width as an unsigned pixel count (0 if negative)
    pub fn width_px(&self) -> u32 {
        self.width.max(0) as u32
    }

    /// Height as an unsigned pixel count (0 if negative)
    pub fn height_px(&self) -> u32 {
        self.height.max(0) as u32
    }

    /// Returns true if the pixel (px, py) lies inside this rectangle
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.width && py < self.y + self.height
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
