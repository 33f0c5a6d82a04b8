//! GPU buffer management
//!
//! `GpuBuffer` wraps a wgpu buffer and provides methods for
//! transferring data between CPU and GPU. Unlike a training workload,
//! the probe allocates exactly once and reads back exactly twice, so
//! there is no buffer pooling here - every failure is surfaced as an
//! error the report can print.

use super::get_gpu_context;
use crate::error::{Result, VoltmeterError};
use std::sync::mpsc;
use std::time::Duration;

/// How long to wait for the GPU when reading results back
const READBACK_TIMEOUT_SECS: u64 = 5;

/// A buffer that lives on the GPU
///
/// This is analogous to a `Vec<f32>` but the data lives in GPU memory.
/// We need to explicitly copy data to/from the CPU.
pub struct GpuBuffer {
    /// The actual GPU buffer
    buffer: wgpu::Buffer,
    /// Size in number of f32 elements
    len: usize,
}

impl GpuBuffer {
    /// Create a new GPU buffer from CPU data
    ///
    /// This copies the data from CPU to GPU memory.
    ///
    /// # Errors
    /// Returns `Unavailable` when there is no GPU context and `Transfer`
    /// when the device rejects the allocation.
    pub fn from_slice(data: &[f32]) -> Result<Self> {
        let ctx = get_gpu_context().ok_or(VoltmeterError::Unavailable)?;
        let byte_size = std::mem::size_of_val(data);

        // Catch allocation failures instead of letting wgpu's uncaptured
        // error handler abort the process.
        ctx.device().push_error_scope(wgpu::ErrorFilter::OutOfMemory);

        // Create a buffer with the STORAGE usage (for compute shaders)
        // and COPY_SRC/COPY_DST for data transfer
        let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Probe Buffer"),
            size: byte_size as u64,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Write the actual data
        ctx.queue()
            .write_buffer(&buffer, 0, bytemuck::cast_slice(data));

        if let Some(e) = pollster::block_on(ctx.device().pop_error_scope()) {
            return Err(VoltmeterError::Transfer(e.to_string()));
        }

        Ok(GpuBuffer {
            buffer,
            len: data.len(),
        })
    }

    /// Create an empty (zeroed) GPU buffer of a given size
    ///
    /// # Errors
    /// Same failure modes as [`GpuBuffer::from_slice`].
    pub fn zeros(len: usize) -> Result<Self> {
        Self::from_slice(&vec![0.0f32; len])
    }

    /// Copy data from GPU back to CPU
    ///
    /// GPU buffers with STORAGE usage can't be mapped directly, so the
    /// data is first copied into a staging buffer with MAP_READ usage.
    ///
    /// # Errors
    /// Returns `Transfer` when the copy, poll, or map step fails.
    pub fn to_vec(&self) -> Result<Vec<f32>> {
        let ctx = get_gpu_context().ok_or(VoltmeterError::Unavailable)?;
        let byte_size = (self.len * std::mem::size_of::<f32>()) as u64;

        let staging_buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging Buffer"),
            size: byte_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // Create a command encoder and copy data
        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Read Buffer Encoder"),
            });

        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging_buffer, 0, byte_size);

        // Submit the copy command
        ctx.queue().submit(Some(encoder.finish()));

        // Map the staging buffer and read the data
        let buffer_slice = staging_buffer.slice(..);

        let (sender, receiver) = mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            // Receiver may be gone if we already bailed out on a poll error
            let _ = sender.send(result);
        });

        // Wait for the GPU to complete the mapping operation.
        ctx.device()
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(READBACK_TIMEOUT_SECS)),
            })
            .map_err(|e| VoltmeterError::Transfer(format!("device poll failed: {e:?}")))?;

        receiver
            .recv()
            .map_err(|_| VoltmeterError::Transfer("map_async callback dropped".to_string()))?
            .map_err(|e| VoltmeterError::Transfer(format!("failed to map buffer: {e}")))?;

        // Read the data
        let data = buffer_slice.get_mapped_range();
        let result: Vec<f32> = bytemuck::cast_slice(&data).to_vec();

        // Unmap before the staging buffer is dropped
        drop(data);
        staging_buffer.unmap();

        Ok(result)
    }

    /// Get the underlying wgpu buffer (for use in compute passes)
    #[must_use]
    pub const fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Get the number of elements
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
