use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{Accelerator, ConvolutionRequest, MIN_REPLY_SIZE, REPLY_BUFFER_SIZE};
use crate::{AcceleratorError, ProtocolPhase};

type Connector<T> = Box<dyn FnMut() -> io::Result<T> + Send>;

/// Adapter of a real accelerator reachable through a byte stream,
/// by default a character device file.
///
/// Requests are written as fixed-size records (see [ConvolutionRequest::to_bytes]),
/// replies are read into a buffer of [REPLY_BUFFER_SIZE] bytes.
pub struct DeviceAccelerator<T: Read + Write = File> {
    name: String,
    connector: Connector<T>,
    link: Option<T>,
}

impl DeviceAccelerator<File> {
    /// Creates adapter of the device with given path.
    /// The device is opened for reading and writing by [Accelerator::open].
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path: PathBuf = path.as_ref().to_owned();
        let name = path.display().to_string();
        Self::with_connector(name, move || {
            OpenOptions::new().read(true).write(true).open(&path)
        })
    }
}

impl<T: Read + Write> DeviceAccelerator<T> {
    /// Creates adapter which uses `connector` to establish link with device.
    pub fn with_connector(
        name: impl Into<String>,
        connector: impl FnMut() -> io::Result<T> + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            connector: Box::new(connector),
            link: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    fn link(&mut self) -> Result<&mut T, AcceleratorError> {
        self.link.as_mut().ok_or(AcceleratorError::SessionNotOpen)
    }
}

impl<T: Read + Write> fmt::Debug for DeviceAccelerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceAccelerator")
            .field("name", &self.name)
            .field("is_open", &self.is_open())
            .finish()
    }
}

impl<T: Read + Write> Accelerator for DeviceAccelerator<T> {
    fn open(&mut self) -> Result<(), AcceleratorError> {
        if self.link.is_some() {
            return Ok(());
        }
        match (self.connector)() {
            Ok(link) => {
                debug!("Device {} is opened", self.name);
                self.link = Some(link);
                Ok(())
            }
            Err(err) => {
                warn!("Failed to open device {}: {}", self.name, err);
                Err(AcceleratorError::OpenFailed)
            }
        }
    }

    fn close(&mut self) -> Result<(), AcceleratorError> {
        let Some(mut link) = self.link.take() else {
            return Ok(());
        };
        link.flush().map_err(|err| {
            warn!("Failed to flush device {}: {}", self.name, err);
            AcceleratorError::CloseFailed
        })?;
        debug!("Device {} is closed", self.name);
        Ok(())
    }

    fn transfer(&mut self, request: &ConvolutionRequest<'_>) -> Result<(), AcceleratorError> {
        let bytes = request.to_bytes();
        let link = self.link()?;
        let res = link.write_all(&bytes).and_then(|_| link.flush());
        res.map_err(|err| {
            warn!("Failed to send request to device {}: {}", self.name, err);
            AcceleratorError::HardwareFault(ProtocolPhase::Transfer)
        })
    }

    fn retrieve(&mut self, reply: &mut [u8; REPLY_BUFFER_SIZE]) -> Result<usize, AcceleratorError> {
        let link = self.link()?;
        let res = read_reply(link, reply);
        res.map_err(|err| {
            warn!("Failed to read reply from device {}: {}", self.name, err);
            AcceleratorError::HardwareFault(ProtocolPhase::Retrieve)
        })
    }
}

/// Reads until the reply holds at least [MIN_REPLY_SIZE] bytes
/// or the link reaches end of stream.
fn read_reply(link: &mut impl Read, reply: &mut [u8]) -> io::Result<usize> {
    let mut len = 0;
    while len < MIN_REPLY_SIZE {
        match link.read(&mut reply[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(len)
}
