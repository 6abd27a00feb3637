#![allow(dead_code)]
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

use edge_accel::gradient::{combine, combine_unidirectional, saturate};
use edge_accel::kernels::MATRIX_SIZE;
use edge_accel::{EdgeFilter, GradientPlane, GrayPlane, OutputPlane, SizeCode};

/// Plane where value of every pixel is calculated by `f(x, y)`.
pub fn plane_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> GrayPlane {
    let mut plane = GrayPlane::new(width, height);
    for y in 0..height {
        for x in 0..width {
            plane.set(x, y, f(x, y));
        }
    }
    plane
}

/// Plane with values that grow from left to right and from top to bottom.
pub fn ramp_plane(width: u32, height: u32) -> GrayPlane {
    plane_from_fn(width, height, |x, y| ((x * 7 + y * 13) % 256) as u8)
}

/// Plane with dark left half and bright right half.
pub fn step_plane(width: u32, height: u32) -> GrayPlane {
    plane_from_fn(width, height, |x, _| if x < width / 2 { 10 } else { 200 })
}

/// Count of cells of the window that are not zero.
pub fn count_non_zero(samples: &[u8; MATRIX_SIZE]) -> usize {
    samples.iter().filter(|&&s| s != 0).count()
}

/// Applies filter directly in plain arithmetic, without windows and accelerator.
pub fn reference_filter(plane: &GrayPlane, filter: EdgeFilter) -> OutputPlane {
    let kernels = filter.kernels();
    let gx = reference_gradient(plane, kernels.gx.weights(), kernels.size_code);
    let gy = kernels
        .gy
        .map(|kernel| reference_gradient(plane, kernel.weights(), kernels.size_code));

    let mut output = OutputPlane::new(plane.width(), plane.height());
    for y in 0..plane.height() {
        for x in 0..plane.width() {
            let value = match &gy {
                Some(gy) => combine(gx.get(x, y), gy.get(x, y)),
                None => combine_unidirectional(gx.get(x, y)),
            };
            output.set(x, y, saturate(value));
        }
    }
    output
}

fn reference_gradient(
    plane: &GrayPlane,
    weights: &[i8; MATRIX_SIZE],
    size: SizeCode,
) -> GradientPlane {
    // Offset of image coordinates relative to cell of the 5x5 grid.
    let origin: i64 = match size {
        SizeCode::TwoByTwo => 0,
        _ => 2,
    };
    let mut gradient = GradientPlane::new(plane.width(), plane.height());
    for y in 0..plane.height() {
        for x in 0..plane.width() {
            let mut sum = 0i32;
            for row in 0..5 {
                for col in 0..5 {
                    let weight = weights[row * 5 + col] as i32;
                    if weight == 0 {
                        continue;
                    }
                    let sx = x as i64 + col as i64 - origin;
                    let sy = y as i64 + row as i64 - origin;
                    let sample = plane.get_checked(sx, sy).unwrap_or(0) as i32;
                    sum += sample * weight;
                }
            }
            gradient.set(x, y, sum as i16);
        }
    }
    gradient
}

#[derive(Debug, Default)]
pub struct LinkState {
    pub written: Vec<u8>,
    pub replies: VecDeque<Vec<u8>>,
    pub fail_writes: bool,
    pub fail_reads: bool,
    pub flushes: usize,
}

/// In-memory transport of the device: records written bytes and returns
/// scripted replies.
#[derive(Debug, Clone, Default)]
pub struct MemoryLink {
    pub state: Arc<Mutex<LinkState>>,
}

impl MemoryLink {
    pub fn with_replies(replies: &[&[u8]]) -> Self {
        let link = Self::default();
        link.state.lock().unwrap().replies = replies.iter().map(|r| r.to_vec()).collect();
        link
    }

    pub fn written(&self) -> Vec<u8> {
        self.state.lock().unwrap().written.clone()
    }
}

impl Read for MemoryLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "read failed"));
        }
        let reply = state.replies.pop_front().unwrap_or_default();
        let len = reply.len().min(buf.len());
        buf[..len].copy_from_slice(&reply[..len]);
        Ok(len)
    }
}

impl Write for MemoryLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write failed"));
        }
        state.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.state.lock().unwrap().flushes += 1;
        Ok(())
    }
}
