use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneBufferError {
    #[error("Size of buffer is smaller than required")]
    InvalidBufferSize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown filter selector: {0}. Choose a number between 1 and 5")]
pub struct UnknownFilterError(pub u32);

/// Phase of the two-call accelerator protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolPhase {
    /// Sending of a convolution request.
    Transfer,
    /// Reading of a convolution result.
    Retrieve,
}

impl fmt::Display for ProtocolPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => f.write_str("transfer"),
            Self::Retrieve => f.write_str("retrieve"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceleratorError {
    #[error("Failed to open session with the accelerator")]
    OpenFailed,
    #[error("Failed to close session with the accelerator")]
    CloseFailed,
    #[error("Session with the accelerator is not open")]
    SessionNotOpen,
    #[error("Accelerator reported a failure in the {0} phase")]
    HardwareFault(ProtocolPhase),
}

#[cfg(feature = "image")]
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode image")]
    Encode(#[source] image::ImageError),
    #[error(transparent)]
    Buffer(#[from] PlaneBufferError),
}
