//! The pixel buffer written by the renderer and saved out through the `image` crate.

use image::{ImageBuffer, Rgba};

use crate::error::Result;
use crate::math::ColorRGB;

pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    colors: Vec<ColorRGB>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        PixelBuffer { width, height, colors: vec![ColorRGB::BLACK; (width * height) as usize] }
    }

    pub fn set(&mut self, x: u32, y: u32, color: ColorRGB) {
        let idx = (y * self.width + x) as usize;
        self.colors[idx] = color;
    }

    /// Tone-maps every pixel and writes the result to `path`; the format is inferred
    /// from the extension (`image::save` supports both BMP and PNG out of the box).
    pub fn save(&self, path: &str) -> Result<()> {
        let mut image_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(self.width, self.height);

        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.colors[(y * self.width + x) as usize].max_to_one();
                let [r, g, b] = color.to_u8();
                image_buffer.put_pixel(x, y, Rgba([r, g, b, 255]));
            }
        }

        image_buffer
            .save(path)
            .map_err(|err| crate::error::RenderError::AssetError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffer_is_black() {
        let buffer = PixelBuffer::new(4, 4);
        assert_eq!(buffer.colors[0], ColorRGB::BLACK);
    }

    #[test]
    fn set_then_read_back_round_trips() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.set(1, 0, ColorRGB::new(1.0, 0.0, 0.0));
        assert_eq!(buffer.colors[1], ColorRGB::new(1.0, 0.0, 0.0));
    }
}
