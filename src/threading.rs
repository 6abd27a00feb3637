use log::debug;
use rayon::prelude::*;

use crate::accelerator::{Accelerator, AcceleratorClient};
use crate::kernels::{Kernel, SizeCode};
use crate::pipeline::{combine_gradients, fill_gradient_row};
use crate::{AcceleratorError, FilterPipeline, GradientPlane, GrayPlane, OutputPlane};

impl FilterPipeline {
    /// Filters the plane in `rayon` thread pool.
    ///
    /// Rows are distributed between jobs and every job opens its own
    /// session with help of `open_session`, so the accelerator never
    /// receives concurrent submissions within one session.
    /// Result is equal to the result of [FilterPipeline::apply].
    pub fn apply_parallel<A, F>(
        &self,
        plane: &GrayPlane,
        open_session: F,
    ) -> Result<OutputPlane, AcceleratorError>
    where
        A: Accelerator,
        F: Fn() -> Result<AcceleratorClient<A>, AcceleratorError> + Sync + Send,
    {
        let kernels = self.kernels();
        let size = kernels.size_code;

        debug!("ComputeGx with filter {} in thread pool", self.filter().name());
        let gx = compute_gradient_par(plane, kernels.gx, size, &open_session)?;
        let gy = match kernels.gy {
            Some(kernel) => {
                debug!("ComputeGy with filter {} in thread pool", self.filter().name());
                Some(compute_gradient_par(plane, kernel, size, &open_session)?)
            }
            None => None,
        };

        debug!("Combine and saturate gradients");
        Ok(combine_gradients(&gx, gy.as_ref()))
    }
}

fn compute_gradient_par<A, F>(
    plane: &GrayPlane,
    kernel: &Kernel,
    size: SizeCode,
    open_session: &F,
) -> Result<GradientPlane, AcceleratorError>
where
    A: Accelerator,
    F: Fn() -> Result<AcceleratorClient<A>, AcceleratorError> + Sync + Send,
{
    let mut gradient = GradientPlane::new(plane.width(), plane.height());
    let row_size = plane.width().max(1) as usize;
    gradient
        .buffer_mut()
        .par_chunks_mut(row_size)
        .enumerate()
        .try_for_each_init(open_session, |session, (y, row)| {
            let client = session.as_mut().map_err(|err| *err)?;
            fill_gradient_row(client, plane, kernel, size, y, row);
            Ok::<(), AcceleratorError>(())
        })?;
    Ok(gradient)
}
