use crate::error::{ImageError, ImageResult};

/// Row-major single-channel `f32` image, intensities normalized to `[0, 1]`.
///
/// Fields are private so an image cannot change once produced; every stage
/// of the pipeline builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Image {
    /// Wrap a row-major buffer, validating its shape and contents
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> ImageResult<Self> {
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidImageSize { width, height });
        }
        let expected_len = width * height;
        if data.len() != expected_len {
            return Err(ImageError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(ImageError::NonFiniteSample {
                x: i % width,
                y: i / width,
            });
        }
        Ok(Self { width, height, data })
    }

    /// Constant-intensity image
    pub fn filled(width: usize, height: usize, value: f32) -> ImageResult<Self> {
        Self::new(width, height, vec![value; width * height])
    }

    /// Build an image by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> ImageResult<Self>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(width, height, data)
    }

    /// Convert an 8-bit grayscale buffer, scaling to `[0, 1]`
    #[cfg(feature = "image")]
    pub fn from_luma8(img: &::image::GrayImage) -> ImageResult<Self> {
        let (w, h) = img.dimensions();
        let data = img.as_raw().iter().map(|&v| f32::from(v) / 255.0).collect();
        Self::new(w as usize, h as usize, data)
    }

    /// Convert back to 8-bit grayscale, clamping to `[0, 1]` first
    #[cfg(feature = "image")]
    pub fn to_luma8(&self) -> ::image::GrayImage {
        let raw = self
            .data
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        // Shape was validated on construction
        ::image::GrayImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| ::image::GrayImage::new(self.width as u32, self.height as u32))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// True when `(x, y)` has a neighbor on every side
    #[inline]
    pub fn is_interior(&self, x: isize, y: isize) -> bool {
        x > 0 && y > 0 && x < self.width as isize - 1 && y < self.height as isize - 1
    }

    /// Central-difference gradient at an interior pixel.
    ///
    /// Returns `(magnitude, direction)` with the direction in degrees in
    /// `[0, 360)`. The y axis points up: `gy = I(y-1) - I(y+1)`.
    #[inline]
    pub fn gradient(&self, x: usize, y: usize) -> (f32, f32) {
        let gx = self.get(x + 1, y) - self.get(x - 1, y);
        let gy = self.get(x, y - 1) - self.get(x, y + 1);
        let magnitude = (gx * gx + gy * gy).sqrt();
        let direction = gy.atan2(gx).to_degrees().rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        let direction = if direction >= 360.0 { 0.0 } else { direction };
        (magnitude, direction)
    }

    /// Pixelwise `self - other`, unclamped
    pub fn subtract(&self, other: &Image) -> ImageResult<Self> {
        if self.dimensions() != other.dimensions() {
            return Err(ImageError::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a - b)
            .collect();
        Self::new(self.width, self.height, data)
    }

    /// Nearest-neighbor x2 downsample: output pixel `(x, y)` is input `(2x, 2y)`
    pub fn half_size(&self) -> ImageResult<Self> {
        let (w, h) = (self.width / 2, self.height / 2);
        Self::from_fn(w, h, |x, y| self.get(2 * x, 2 * y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Image {
        Image::from_fn(width, height, |x, y| (x + y * width) as f32 / (width * height) as f32)
            .unwrap()
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Image::new(0, 4, vec![]),
            Err(ImageError::InvalidImageSize { .. })
        ));
        assert!(matches!(
            Image::new(4, 0, vec![]),
            Err(ImageError::InvalidImageSize { .. })
        ));
    }

    #[test]
    fn test_invalid_data_length() {
        let result = Image::new(4, 4, vec![0.0; 15]);
        assert_eq!(
            result,
            Err(ImageError::InvalidImageData { expected_len: 16, actual_len: 15 })
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut data = vec![0.5; 9];
        data[5] = f32::NAN;
        assert_eq!(
            Image::new(3, 3, data),
            Err(ImageError::NonFiniteSample { x: 2, y: 1 })
        );
    }

    #[test]
    fn test_half_size_takes_even_pixels() {
        let img = ramp(9, 6);
        let half = img.half_size().unwrap();
        assert_eq!(half.dimensions(), (4, 3));
        assert_eq!(half.get(1, 1), img.get(2, 2));
        assert_eq!(half.get(3, 2), img.get(6, 4));
    }

    #[test]
    fn test_subtract() {
        let a = Image::filled(5, 5, 0.75).unwrap();
        let b = Image::filled(5, 5, 1.0).unwrap();
        let d = b.subtract(&a).unwrap();
        assert!(d.as_slice().iter().all(|&v| (v - 0.25).abs() < 1e-7));
        let c = Image::filled(4, 5, 1.0).unwrap();
        assert!(matches!(a.subtract(&c), Err(ImageError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_gradient_direction() {
        // Intensity rising to the right: gradient points along +x
        let img = Image::from_fn(5, 5, |x, _| x as f32 * 0.1).unwrap();
        let (mag, dir) = img.gradient(2, 2);
        assert!((mag - 0.2).abs() < 1e-6);
        assert!(dir.abs() < 1e-4);

        // Intensity rising upwards (towards row 0): direction 90 degrees
        let img = Image::from_fn(5, 5, |_, y| (4 - y) as f32 * 0.1).unwrap();
        let (_, dir) = img.gradient(2, 2);
        assert!((dir - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_gradient_of_flat_image() {
        let img = Image::filled(3, 3, 0.3).unwrap();
        assert_eq!(img.gradient(1, 1), (0.0, 0.0));
    }

    #[test]
    fn test_is_interior() {
        let img = Image::filled(4, 3, 0.0).unwrap();
        assert!(img.is_interior(1, 1));
        assert!(img.is_interior(2, 1));
        assert!(!img.is_interior(0, 1));
        assert!(!img.is_interior(3, 1));
        assert!(!img.is_interior(1, 2));
        assert!(!img.is_interior(-1, 1));
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_luma8_conversion() {
        let gray = ::image::GrayImage::from_fn(4, 2, |x, _| ::image::Luma([(x * 85) as u8]));
        let img = Image::from_luma8(&gray).unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert!((img.get(3, 1) - 1.0).abs() < 1e-6);
        assert_eq!(img.to_luma8(), gray);
    }
}
