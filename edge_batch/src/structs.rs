use edge_accel as ea;

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterType {
    /// Sobel operator with 3x3 kernels.
    Sobel3x3,
    /// Expanded Sobel operator with 5x5 kernels.
    Sobel5x5,
    /// Prewitt operator with 3x3 kernels.
    Prewitt3x3,
    /// Roberts cross operator with 2x2 kernels.
    Roberts2x2,
    /// Laplace operator with single 5x5 kernel.
    Laplace5x5,
}

impl From<FilterType> for ea::EdgeFilter {
    fn from(filter_type: FilterType) -> Self {
        match filter_type {
            FilterType::Sobel3x3 => ea::EdgeFilter::Sobel3x3,
            FilterType::Sobel5x5 => ea::EdgeFilter::Sobel5x5,
            FilterType::Prewitt3x3 => ea::EdgeFilter::Prewitt3x3,
            FilterType::Roberts2x2 => ea::EdgeFilter::Roberts2x2,
            FilterType::Laplace5x5 => ea::EdgeFilter::Laplace5x5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// Real accelerator reachable through the device file.
    Device,
    /// Software simulator of the accelerator.
    Software,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SizeField {
    /// Always send the code of 5x5 kernels.
    Pinned,
    /// Send the real size code of kernels.
    Kernel,
}

impl From<SizeField> for ea::SizeFieldPolicy {
    fn from(size_field: SizeField) -> Self {
        match size_field {
            SizeField::Pinned => ea::SizeFieldPolicy::Pinned,
            SizeField::Kernel => ea::SizeFieldPolicy::KernelSize,
        }
    }
}
