//! GPU kernel execution
//!
//! Dispatching the probe's compute shader: create a command buffer,
//! bind the pipeline and buffers, and submit work to the GPU. A wgpu
//! error scope around the dispatch turns validation failures into
//! errors the report can print instead of process aborts.

use super::{GpuBuffer, get_gpu_context};
use crate::error::{Result, VoltmeterError};

/// High-level interface for GPU kernel execution
pub struct GpuKernels;

impl GpuKernels {
    /// Execute an element-wise add: `out[i] = a[i] + b[i]`
    ///
    /// # Arguments
    /// * `a` - First input buffer
    /// * `b` - Second input buffer (must be same size as a)
    ///
    /// # Returns
    /// A new buffer containing the result
    ///
    /// # Errors
    /// Returns `Unavailable` without a GPU context and `Compute` when the
    /// device reports an error for the dispatch.
    ///
    /// # Panics
    /// Panics if the buffer lengths differ.
    pub fn add(a: &GpuBuffer, b: &GpuBuffer) -> Result<GpuBuffer> {
        assert_eq!(a.len(), b.len(), "Buffer sizes must match for binary ops");

        let ctx = get_gpu_context().ok_or(VoltmeterError::Unavailable)?;
        let result = GpuBuffer::zeros(a.len())?;

        let pipeline = ctx.add_pipeline();

        // Create bind group - this connects our buffers to the shader
        let bind_group_layout = pipeline.get_bind_group_layout(0);
        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Add Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: a.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: b.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: result.buffer().as_entire_binding(),
                },
            ],
        });

        ctx.device().push_error_scope(wgpu::ErrorFilter::Validation);

        // Create command encoder and dispatch
        let mut encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Add Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Add Pass"),
                timestamp_writes: None,
            });

            compute_pass.set_pipeline(pipeline);
            compute_pass.set_bind_group(0, &bind_group, &[]);

            // Each workgroup processes 256 elements (defined in shader)
            let workgroup_count = (a.len() as u32).div_ceil(256);
            compute_pass.dispatch_workgroups(workgroup_count, 1, 1);
        }

        // Submit to GPU
        ctx.queue().submit(Some(encoder.finish()));

        if let Some(e) = pollster::block_on(ctx.device().pop_error_scope()) {
            return Err(VoltmeterError::Compute(e.to_string()));
        }

        Ok(result)
    }
}
