use crate::PlaneBufferError;

/// Owned two-dimensional buffer of values stored row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane<T> {
    width: u32,
    height: u32,
    buffer: Vec<T>,
}

/// Grayscale samples of an image.
pub type GrayPlane = Plane<u8>;
/// Per-pixel signed results of convolution in one direction.
pub type GradientPlane = Plane<i16>;
/// Final filtered image.
pub type OutputPlane = Plane<u8>;
/// RGB image with three components per pixel.
pub type RgbPlane = Plane<[u8; 3]>;

impl<T: Copy + Default> Plane<T> {
    /// Create a plane with given dimensions filled by default values.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    /// Create a plane with given dimensions filled by `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            buffer: vec![value; len],
        }
    }

    /// Create a plane from vector with values.
    ///
    /// Values after `width * height` are dropped.
    pub fn from_vec(
        width: u32,
        height: u32,
        mut buffer: Vec<T>,
    ) -> Result<Self, PlaneBufferError> {
        let size = width as usize * height as usize;
        if buffer.len() < size {
            return Err(PlaneBufferError::InvalidBufferSize);
        }
        buffer.truncate(size);
        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Buffer with values of the plane.
    #[inline]
    pub fn buffer(&self) -> &[T] {
        &self.buffer
    }

    #[inline]
    pub fn buffer_mut(&mut self) -> &mut [T] {
        &mut self.buffer
    }

    /// Returns value at the given position.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of the plane boundaries.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        assert!(x < self.width && y < self.height);
        self.buffer[self.index(x, y)]
    }

    /// Returns value at the given position or `None` if the position
    /// is out of the plane boundaries.
    #[inline]
    pub fn get_checked(&self, x: i64, y: i64) -> Option<T> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.buffer[self.index(x as u32, y as u32)])
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        assert!(x < self.width && y < self.height);
        let index = self.index(x, y);
        self.buffer[index] = value;
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.buffer.chunks_exact_mut(self.width.max(1) as usize)
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
