// Core types shared by the engine and the window wiring.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // surface width in pixels
    pub height: usize,     // surface height in pixels
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// Allocate a black surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; width * height],
        }
    }

    /// Clear the whole rectangle back to black.
    /// Visual: everything drawn last frame disappears.
    pub fn clear(&mut self) {
        for px in &mut self.pixels {
            *px = 0;
        }
    }
}

/// Latest pointer position in surface coordinates.
/// One writer (the input poll in main) and one reader (the engine), both on
/// the same thread, so a read always sees the most recent write. If this
/// ever moves off the main thread, swap the plain fields for atomics.
#[derive(Clone, Copy)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}
