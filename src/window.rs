use crate::kernels::{SizeCode, MATRIX_SIDE, MATRIX_SIZE};
use crate::GrayPlane;

/// Samples of a 5x5 neighbourhood of a pixel.
///
/// Cells outside the active region of the window and cells mapped
/// from coordinates outside the image are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window([u8; MATRIX_SIZE]);

impl Window {
    pub const fn new(samples: [u8; MATRIX_SIZE]) -> Self {
        Self(samples)
    }

    #[inline]
    pub fn samples(&self) -> &[u8; MATRIX_SIZE] {
        &self.0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.0[row * MATRIX_SIDE + col]
    }
}

/// Extracts a window of the given size around the pixel `(center_x, center_y)`.
///
/// For 2x2 windows the pixel is the top-left corner of the window, and
/// the window occupies the top-left corner of the buffer. Bigger windows
/// are centered on the pixel and on the cell `(2, 2)` of the buffer.
/// Samples outside the plane are replaced by zeros.
pub fn extract_window(plane: &GrayPlane, center_x: i64, center_y: i64, size: SizeCode) -> Window {
    let mut samples = [0u8; MATRIX_SIZE];
    let (first, last, buf_offset) = match size {
        SizeCode::TwoByTwo => (0, 1, 0),
        _ => {
            let half = (size.extent() / 2) as i64;
            (-half, half, 2)
        }
    };

    for dy in first..=last {
        let row = (dy + buf_offset) as usize;
        for dx in first..=last {
            let col = (dx + buf_offset) as usize;
            let (Some(x), Some(y)) = (center_x.checked_add(dx), center_y.checked_add(dy)) else {
                continue;
            };
            if let Some(sample) = plane.get_checked(x, y) {
                samples[row * MATRIX_SIDE + col] = sample;
            }
        }
    }
    Window(samples)
}
