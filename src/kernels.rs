//! Static table of edge-detection kernels.
//!
//! Every kernel is stored as a 5x5 grid of weights. Smaller kernels are
//! embedded into this grid, the remaining cells are zero:
//! 2x2 kernels occupy the top-left corner, 3x3 kernels are centered.
use crate::UnknownFilterError;

/// Count of cells in the 5x5 grid used for windows and kernels.
pub const MATRIX_SIZE: usize = 25;
/// Width (and height) of the 5x5 grid.
pub const MATRIX_SIDE: usize = 5;

/// Extent of a window and kernel.
///
/// Numeric codes are not contiguous: `0` - 2x2, `1` - 3x3, `3` - 5x5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SizeCode {
    TwoByTwo = 0,
    ThreeByThree = 1,
    FiveByFive = 3,
}

impl SizeCode {
    /// Numeric code used in the accelerator protocol.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::TwoByTwo),
            1 => Some(Self::ThreeByThree),
            3 => Some(Self::FiveByFive),
            _ => None,
        }
    }

    /// Length of the side of the active window.
    #[inline]
    pub fn extent(self) -> usize {
        match self {
            Self::TwoByTwo => 2,
            Self::ThreeByThree => 3,
            Self::FiveByFive => 5,
        }
    }

    /// Returns `true` if the cell of the 5x5 grid belongs to
    /// the active region of this size.
    pub fn is_active_cell(self, row: usize, col: usize) -> bool {
        match self {
            Self::TwoByTwo => row < 2 && col < 2,
            Self::ThreeByThree => (1..=3).contains(&row) && (1..=3).contains(&col),
            Self::FiveByFive => row < MATRIX_SIDE && col < MATRIX_SIDE,
        }
    }
}

/// Signed 8-bit weights of a 5x5 convolution kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel([i8; MATRIX_SIZE]);

impl Kernel {
    pub const fn new(weights: [i8; MATRIX_SIZE]) -> Self {
        Self(weights)
    }

    #[inline]
    pub fn weights(&self) -> &[i8; MATRIX_SIZE] {
        &self.0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.0[row * MATRIX_SIDE + col]
    }
}

#[rustfmt::skip]
pub const SOBEL_GX_3X3: Kernel = Kernel::new([
     0,  0,  0,  0,  0,
     0, -1,  0,  1,  0,
     0, -2,  0,  2,  0,
     0, -1,  0,  1,  0,
     0,  0,  0,  0,  0,
]);

#[rustfmt::skip]
pub const SOBEL_GY_3X3: Kernel = Kernel::new([
     0,  0,  0,  0,  0,
     0, -1, -2, -1,  0,
     0,  0,  0,  0,  0,
     0,  1,  2,  1,  0,
     0,  0,  0,  0,  0,
]);

#[rustfmt::skip]
pub const SOBEL_GX_5X5: Kernel = Kernel::new([
     2,  2,  4,  2,  2,
     1,  1,  2,  1,  1,
     0,  0,  0,  0,  0,
    -1, -1, -2, -1, -1,
    -2, -2, -4, -2, -2,
]);

#[rustfmt::skip]
pub const SOBEL_GY_5X5: Kernel = Kernel::new([
     2,  1,  0, -1, -2,
     2,  1,  0, -1, -2,
     4,  2,  0, -2, -4,
     2,  1,  0, -1, -2,
     2,  1,  0, -1, -2,
]);

#[rustfmt::skip]
pub const PREWITT_GX_3X3: Kernel = Kernel::new([
     0,  0,  0,  0,  0,
     0, -1,  0,  1,  0,
     0, -1,  0,  1,  0,
     0, -1,  0,  1,  0,
     0,  0,  0,  0,  0,
]);

#[rustfmt::skip]
pub const PREWITT_GY_3X3: Kernel = Kernel::new([
     0,  0,  0,  0,  0,
     0, -1, -1, -1,  0,
     0,  0,  0,  0,  0,
     0,  1,  1,  1,  0,
     0,  0,  0,  0,  0,
]);

#[rustfmt::skip]
pub const ROBERTS_GX_2X2: Kernel = Kernel::new([
     1,  0,  0,  0,  0,
     0, -1,  0,  0,  0,
     0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
]);

#[rustfmt::skip]
pub const ROBERTS_GY_2X2: Kernel = Kernel::new([
     0,  1,  0,  0,  0,
    -1,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,
]);

#[rustfmt::skip]
pub const LAPLACE_5X5: Kernel = Kernel::new([
     0,  0, -1,  0,  0,
     0, -1, -2, -1,  0,
    -1, -2, 16, -2, -1,
     0, -1, -2, -1,  0,
     0,  0, -1,  0,  0,
]);

/// Kernels of one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKernels {
    pub gx: &'static Kernel,
    /// `None` for unidirectional filters.
    pub gy: Option<&'static Kernel>,
    pub size_code: SizeCode,
}

impl FilterKernels {
    #[inline]
    pub fn is_bidirectional(&self) -> bool {
        self.gy.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum EdgeFilter {
    /// Classic Sobel operator.
    Sobel3x3,
    /// Expanded Sobel operator with 5x5 kernels.
    Sobel5x5,
    /// Prewitt operator, Sobel without center weighting.
    Prewitt3x3,
    /// Roberts cross operator on diagonal differences.
    Roberts2x2,
    /// Laplace operator. It is unidirectional,
    /// the response is the absolute value of the single convolution.
    Laplace5x5,
}

impl EdgeFilter {
    pub const ALL: [EdgeFilter; 5] = [
        Self::Sobel3x3,
        Self::Sobel5x5,
        Self::Prewitt3x3,
        Self::Roberts2x2,
        Self::Laplace5x5,
    ];

    /// Returns filter by its number in the menu (`1..=5`).
    pub fn from_selector(selector: u32) -> Result<Self, UnknownFilterError> {
        match selector {
            1 => Ok(Self::Sobel3x3),
            2 => Ok(Self::Sobel5x5),
            3 => Ok(Self::Prewitt3x3),
            4 => Ok(Self::Roberts2x2),
            5 => Ok(Self::Laplace5x5),
            _ => Err(UnknownFilterError(selector)),
        }
    }

    pub fn selector(self) -> u32 {
        match self {
            Self::Sobel3x3 => 1,
            Self::Sobel5x5 => 2,
            Self::Prewitt3x3 => 3,
            Self::Roberts2x2 => 4,
            Self::Laplace5x5 => 5,
        }
    }

    /// Name used as suffix of result files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sobel3x3 => "sobel_3x3",
            Self::Sobel5x5 => "sobel_5x5",
            Self::Prewitt3x3 => "prewitt_3x3",
            Self::Roberts2x2 => "roberts_2x2",
            Self::Laplace5x5 => "laplace_5x5",
        }
    }

    pub fn kernels(self) -> FilterKernels {
        let (gx, gy, size_code) = match self {
            Self::Sobel3x3 => (&SOBEL_GX_3X3, Some(&SOBEL_GY_3X3), SizeCode::ThreeByThree),
            Self::Sobel5x5 => (&SOBEL_GX_5X5, Some(&SOBEL_GY_5X5), SizeCode::FiveByFive),
            Self::Prewitt3x3 => (
                &PREWITT_GX_3X3,
                Some(&PREWITT_GY_3X3),
                SizeCode::ThreeByThree,
            ),
            Self::Roberts2x2 => (&ROBERTS_GX_2X2, Some(&ROBERTS_GY_2X2), SizeCode::TwoByTwo),
            Self::Laplace5x5 => (&LAPLACE_5X5, None, SizeCode::FiveByFive),
        };
        FilterKernels { gx, gy, size_code }
    }

    #[inline]
    pub fn size_code(self) -> SizeCode {
        self.kernels().size_code
    }
}
