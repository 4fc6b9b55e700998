// PNG snapshots of the field.
// Visual: pressing S leaves a flow-NNNN.png in the working directory; the
// window itself is unaffected.

use crate::error::Error;
use crate::types::FrameBuffer;
use image::{ImageBuffer, Rgb};

/// Encode the 0x00RRGGBB buffer as an RGB PNG at `path`.
pub fn save_png(fb: &FrameBuffer, path: &str) -> Result<(), Error> {
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::new(fb.width as u32, fb.height as u32);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let px = fb.pixels[y as usize * fb.width + x as usize];
        *pixel = Rgb([
            ((px >> 16) & 0xFF) as u8,
            ((px >> 8) & 0xFF) as u8,
            (px & 0xFF) as u8,
        ]);
    }

    img.save(path)
        .map_err(|e| Error::Snapshot(format!("Write {path}: {e}")))?;
    Ok(())
}
