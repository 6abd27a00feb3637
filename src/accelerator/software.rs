use std::collections::HashSet;

use super::{Accelerator, ConvolutionRequest, CONVOLUTION_OPCODE, REPLY_BUFFER_SIZE};
use crate::kernels::{SizeCode, MATRIX_SIDE};
use crate::{AcceleratorError, ProtocolPhase};

/// Software implementation of the accelerator.
///
/// Convolution is computed in plain integer arithmetic over the region
/// selected by the size field of the request. The result is truncated
/// to 16 bits as the device does. Failures of any phase
/// can be injected for testing.
#[derive(Debug, Clone, Default)]
pub struct SoftwareAccelerator {
    is_open: bool,
    staged_reply: Option<[u8; 2]>,
    transfers: usize,
    retrieves: usize,
    last_opcode: Option<u32>,
    last_size_field: Option<u32>,
    fail_open: bool,
    failed_transfers: HashSet<usize>,
    failed_retrieves: HashSet<usize>,
}

impl SoftwareAccelerator {
    pub fn new() -> Self {
        Default::default()
    }

    /// Make [Accelerator::open] fail.
    pub fn fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Make the transfer with given 0-based index fail.
    pub fn fail_transfer_at(mut self, call: usize) -> Self {
        self.failed_transfers.insert(call);
        self
    }

    /// Make the retrieve with given 0-based index fail.
    pub fn fail_retrieve_at(mut self, call: usize) -> Self {
        self.failed_retrieves.insert(call);
        self
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Count of transfer calls, including failed ones.
    #[inline]
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    /// Count of retrieve calls, including failed ones.
    #[inline]
    pub fn retrieves(&self) -> usize {
        self.retrieves
    }

    #[inline]
    pub fn last_opcode(&self) -> Option<u32> {
        self.last_opcode
    }

    #[inline]
    pub fn last_size_field(&self) -> Option<u32> {
        self.last_size_field
    }
}

/// Reference convolution of the region of the request selected by `size`.
pub fn convolve_region(request: &ConvolutionRequest<'_>, size: SizeCode) -> i16 {
    let mut sum = 0i32;
    for row in 0..MATRIX_SIDE {
        for col in 0..MATRIX_SIDE {
            if size.is_active_cell(row, col) {
                sum += request.window.get(row, col) as i32 * request.kernel.get(row, col) as i32;
            }
        }
    }
    sum as i16
}

impl Accelerator for SoftwareAccelerator {
    fn open(&mut self) -> Result<(), AcceleratorError> {
        if self.fail_open {
            return Err(AcceleratorError::OpenFailed);
        }
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), AcceleratorError> {
        self.is_open = false;
        self.staged_reply = None;
        Ok(())
    }

    fn transfer(&mut self, request: &ConvolutionRequest<'_>) -> Result<(), AcceleratorError> {
        if !self.is_open {
            return Err(AcceleratorError::SessionNotOpen);
        }
        let call = self.transfers;
        self.transfers += 1;
        self.staged_reply = None;
        self.last_opcode = Some(request.opcode);
        self.last_size_field = Some(request.size);

        const FAULT: AcceleratorError = AcceleratorError::HardwareFault(ProtocolPhase::Transfer);
        if self.failed_transfers.contains(&call) || request.opcode != CONVOLUTION_OPCODE {
            return Err(FAULT);
        }
        let size = SizeCode::from_code(request.size).ok_or(FAULT)?;
        self.staged_reply = Some(convolve_region(request, size).to_le_bytes());
        Ok(())
    }

    fn retrieve(&mut self, reply: &mut [u8; REPLY_BUFFER_SIZE]) -> Result<usize, AcceleratorError> {
        if !self.is_open {
            return Err(AcceleratorError::SessionNotOpen);
        }
        let call = self.retrieves;
        self.retrieves += 1;
        let staged = self.staged_reply.take();
        if self.failed_retrieves.contains(&call) {
            return Err(AcceleratorError::HardwareFault(ProtocolPhase::Retrieve));
        }
        let bytes = staged.ok_or(AcceleratorError::HardwareFault(ProtocolPhase::Retrieve))?;
        reply[..2].copy_from_slice(&bytes);
        Ok(bytes.len())
    }
}
