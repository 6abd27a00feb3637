#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

pub use accelerator::{
    Accelerator, AcceleratorClient, ClientOptions, ConvolutionRequest, DeviceAccelerator,
    SizeFieldPolicy, SoftwareAccelerator,
};
pub use errors::*;
pub use kernels::{EdgeFilter, FilterKernels, Kernel, SizeCode};
pub use pipeline::FilterPipeline;
pub use plane::{GradientPlane, GrayPlane, OutputPlane, Plane, RgbPlane};
pub use window::{extract_window, Window};

pub mod accelerator;
mod errors;
pub mod gradient;
pub mod kernels;
mod pipeline;
mod plane;
mod window;

cfg_if::cfg_if! {
    if #[cfg(feature = "image")] {
        pub mod codec;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        mod threading;
    }
}
