use log::debug;

use crate::accelerator::{Accelerator, AcceleratorClient};
use crate::gradient::{combine, combine_unidirectional, saturate};
use crate::kernels::{EdgeFilter, FilterKernels, Kernel, SizeCode};
use crate::window::extract_window;
use crate::{GradientPlane, GrayPlane, OutputPlane};

/// Applies an edge-detection filter to grayscale planes,
/// computing every convolution on the accelerator.
///
/// Filtering goes through the stages:
/// `ComputeGx -> ComputeGy (only for bidirectional filters) -> Combine+Saturate`.
/// Gradient planes are allocated for each call and are not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPipeline {
    filter: EdgeFilter,
    kernels: FilterKernels,
}

impl FilterPipeline {
    pub fn new(filter: EdgeFilter) -> Self {
        Self {
            filter,
            kernels: filter.kernels(),
        }
    }

    #[inline]
    pub fn filter(&self) -> EdgeFilter {
        self.filter
    }

    #[inline]
    pub fn kernels(&self) -> FilterKernels {
        self.kernels
    }

    /// Filters the plane, pixels are processed in raster order.
    ///
    /// Failed convolutions give zero gradients; count of such failures
    /// is available through [AcceleratorClient::fault_count].
    pub fn apply<A: Accelerator>(
        &self,
        client: &mut AcceleratorClient<A>,
        plane: &GrayPlane,
    ) -> OutputPlane {
        let size = self.kernels.size_code;

        debug!("ComputeGx with filter {}", self.filter.name());
        let gx = compute_gradient(client, plane, self.kernels.gx, size);

        let gy = self.kernels.gy.map(|kernel| {
            debug!("ComputeGy with filter {}", self.filter.name());
            compute_gradient(client, plane, kernel, size)
        });

        debug!("Combine and saturate gradients");
        let output = combine_gradients(&gx, gy.as_ref());
        debug!("Filter {} is applied", self.filter.name());
        output
    }
}

fn compute_gradient<A: Accelerator>(
    client: &mut AcceleratorClient<A>,
    plane: &GrayPlane,
    kernel: &Kernel,
    size: SizeCode,
) -> GradientPlane {
    let mut gradient = GradientPlane::new(plane.width(), plane.height());
    for (y, row) in gradient.rows_mut().enumerate() {
        fill_gradient_row(client, plane, kernel, size, y, row);
    }
    gradient
}

#[inline]
pub(crate) fn fill_gradient_row<A: Accelerator>(
    client: &mut AcceleratorClient<A>,
    plane: &GrayPlane,
    kernel: &Kernel,
    size: SizeCode,
    y: usize,
    row: &mut [i16],
) {
    for (x, dst) in row.iter_mut().enumerate() {
        let window = extract_window(plane, x as i64, y as i64, size);
        *dst = client.convolve(&window, kernel, size);
    }
}

pub(crate) fn combine_gradients(gx: &GradientPlane, gy: Option<&GradientPlane>) -> OutputPlane {
    let mut output = OutputPlane::new(gx.width(), gx.height());
    let dst = output.buffer_mut();
    match gy {
        Some(gy) => {
            for ((d, &x), &y) in dst.iter_mut().zip(gx.buffer()).zip(gy.buffer()) {
                *d = saturate(combine(x, y));
            }
        }
        None => {
            for (d, &x) in dst.iter_mut().zip(gx.buffer()) {
                *d = saturate(combine_unidirectional(x));
            }
        }
    }
    output
}
