//! Protocol of communication with the external convolution accelerator.
//!
//! Every convolution is performed in two sequential phases:
//! a request with the window and the kernel is *transferred* to the device,
//! then a reply with the 16-bit little-endian result is *retrieved*.
//! One session (`open` -> many submissions -> `close`) is used for
//! a whole batch of images.
use log::{debug, trace, warn};

pub use device::DeviceAccelerator;
pub use software::{convolve_region, SoftwareAccelerator};

use crate::kernels::{Kernel, SizeCode, MATRIX_SIZE};
use crate::window::Window;
use crate::{AcceleratorError, ProtocolPhase};

mod device;
mod software;

/// Opcode which identifies convolution for the accelerator.
pub const CONVOLUTION_OPCODE: u32 = 7;
/// Size of the serialized [ConvolutionRequest].
pub const REQUEST_SIZE: usize = 2 * MATRIX_SIZE + 8;
/// Size of the buffer used to read replies from the accelerator.
pub const REPLY_BUFFER_SIZE: usize = MATRIX_SIZE;
/// Minimal count of meaningful bytes in a reply.
pub const MIN_REPLY_SIZE: usize = 2;

/// Low-level access to a convolution device.
///
/// Implementations are not required to support concurrent calls;
/// [AcceleratorClient] never overlaps them.
pub trait Accelerator {
    fn open(&mut self) -> Result<(), AcceleratorError>;

    fn close(&mut self) -> Result<(), AcceleratorError>;

    /// Sends the request to the device.
    fn transfer(&mut self, request: &ConvolutionRequest<'_>) -> Result<(), AcceleratorError>;

    /// Reads reply of the device into the buffer and returns count of read bytes.
    fn retrieve(&mut self, reply: &mut [u8; REPLY_BUFFER_SIZE]) -> Result<usize, AcceleratorError>;
}

impl<A: Accelerator + ?Sized> Accelerator for Box<A> {
    fn open(&mut self) -> Result<(), AcceleratorError> {
        (**self).open()
    }

    fn close(&mut self) -> Result<(), AcceleratorError> {
        (**self).close()
    }

    fn transfer(&mut self, request: &ConvolutionRequest<'_>) -> Result<(), AcceleratorError> {
        (**self).transfer(request)
    }

    fn retrieve(&mut self, reply: &mut [u8; REPLY_BUFFER_SIZE]) -> Result<usize, AcceleratorError> {
        (**self).retrieve(reply)
    }
}

/// Request of one convolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvolutionRequest<'a> {
    pub window: &'a Window,
    pub kernel: &'a Kernel,
    pub opcode: u32,
    pub size: u32,
}

impl<'a> ConvolutionRequest<'a> {
    /// Serializes request into the fixed-size record:
    /// window samples, kernel weights, opcode and size (both u32 LE).
    pub fn to_bytes(&self) -> [u8; REQUEST_SIZE] {
        let mut bytes = [0u8; REQUEST_SIZE];
        let (window_part, rest) = bytes.split_at_mut(MATRIX_SIZE);
        let (kernel_part, rest) = rest.split_at_mut(MATRIX_SIZE);
        window_part.copy_from_slice(self.window.samples());
        kernel_part
            .iter_mut()
            .zip(self.kernel.weights())
            .for_each(|(dst, &w)| *dst = w as u8);
        rest[..4].copy_from_slice(&self.opcode.to_le_bytes());
        rest[4..].copy_from_slice(&self.size.to_le_bytes());
        bytes
    }
}

/// Decodes a result of convolution from the first two bytes of reply.
#[inline]
pub fn decode_result(reply: &[u8]) -> i16 {
    i16::from_le_bytes([reply[0], reply[1]])
}

/// Value of the size field of [ConvolutionRequest].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeFieldPolicy {
    /// Always send the code of 5x5 kernels, whatever size the kernel has.
    #[default]
    Pinned,
    /// Send the real size code of the kernel.
    KernelSize,
}

impl SizeFieldPolicy {
    #[inline]
    pub fn size_field(self, size: SizeCode) -> u32 {
        match self {
            Self::Pinned => SizeCode::FiveByFive.code(),
            Self::KernelSize => size.code(),
        }
    }
}

/// Options of [AcceleratorClient].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct ClientOptions {
    pub size_field: SizeFieldPolicy,
    pub opcode: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            size_field: SizeFieldPolicy::Pinned,
            opcode: CONVOLUTION_OPCODE,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the policy used to fill the size field of requests.
    ///
    /// By default, equal to [SizeFieldPolicy::Pinned].
    pub fn size_field(&self, size_field: SizeFieldPolicy) -> Self {
        let mut options = *self;
        options.size_field = size_field;
        options
    }

    /// Set the opcode sent with requests.
    ///
    /// By default, equal to [CONVOLUTION_OPCODE].
    pub fn opcode(&self, opcode: u32) -> Self {
        let mut options = *self;
        options.opcode = opcode;
        options
    }
}

/// Open session with an accelerator.
///
/// The session is closed by [AcceleratorClient::close] or on drop.
#[derive(Debug)]
pub struct AcceleratorClient<A: Accelerator> {
    accelerator: A,
    options: ClientOptions,
    is_open: bool,
    fault_count: u64,
}

impl<A: Accelerator> AcceleratorClient<A> {
    /// Opens a session with default options.
    pub fn open(accelerator: A) -> Result<Self, AcceleratorError> {
        Self::open_with_options(accelerator, ClientOptions::default())
    }

    pub fn open_with_options(
        mut accelerator: A,
        options: ClientOptions,
    ) -> Result<Self, AcceleratorError> {
        accelerator.open()?;
        debug!("Accelerator session is opened with {:?}", options);
        Ok(Self {
            accelerator,
            options,
            is_open: true,
            fault_count: 0,
        })
    }

    #[inline]
    pub fn options(&self) -> ClientOptions {
        self.options
    }

    #[inline]
    pub fn accelerator(&self) -> &A {
        &self.accelerator
    }

    /// Count of submissions failed since the session was opened.
    #[inline]
    pub fn fault_count(&self) -> u64 {
        self.fault_count
    }

    /// Performs convolution of the window with the kernel on the accelerator.
    pub fn submit(
        &mut self,
        window: &Window,
        kernel: &Kernel,
        size: SizeCode,
    ) -> Result<i16, AcceleratorError> {
        let request = ConvolutionRequest {
            window,
            kernel,
            opcode: self.options.opcode,
            size: self.options.size_field.size_field(size),
        };
        if let Err(err) = self.accelerator.transfer(&request) {
            self.fault_count += 1;
            return Err(err);
        }

        let mut reply = [0u8; REPLY_BUFFER_SIZE];
        let read = match self.accelerator.retrieve(&mut reply) {
            Ok(read) => read,
            Err(err) => {
                self.fault_count += 1;
                return Err(err);
            }
        };
        if read < MIN_REPLY_SIZE {
            self.fault_count += 1;
            return Err(AcceleratorError::HardwareFault(ProtocolPhase::Retrieve));
        }
        let result = decode_result(&reply);
        trace!("Convolution result: {}", result);
        Ok(result)
    }

    /// Same as [AcceleratorClient::submit] but a failed submission
    /// gives zero result instead of error.
    pub fn convolve(&mut self, window: &Window, kernel: &Kernel, size: SizeCode) -> i16 {
        match self.submit(window, kernel, size) {
            Ok(result) => result,
            Err(err) => {
                warn!("{}; zero is used as convolution result", err);
                0
            }
        }
    }

    /// Closes the session.
    pub fn close(mut self) -> Result<(), AcceleratorError> {
        self.is_open = false;
        debug!(
            "Closing accelerator session, {} faults were absorbed",
            self.fault_count
        );
        self.accelerator.close()
    }
}

impl<A: Accelerator> Drop for AcceleratorClient<A> {
    fn drop(&mut self) {
        if self.is_open {
            self.is_open = false;
            if let Err(err) = self.accelerator.close() {
                warn!("{}", err);
            }
        }
    }
}
