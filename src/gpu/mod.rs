//! GPU backend for the diagnostic probe using wgpu
//!
//! The key components are:
//! - `GpuContext`: Manages the GPU device and command queue
//! - `GpuBuffer`: Holds probe data on the GPU
//! - `GpuKernels`: Dispatches the element-wise add shader

mod buffer;
mod context;
mod kernels;

pub use buffer::GpuBuffer;
pub use context::GpuContext;
pub use kernels::GpuKernels;

use std::sync::OnceLock;

// Global GPU context - initialized lazily on first use
static GPU_CONTEXT: OnceLock<Option<GpuContext>> = OnceLock::new();

/// Get the global GPU context, initializing it if necessary
/// Returns None if GPU is not available
pub fn get_gpu_context() -> Option<&'static GpuContext> {
    GPU_CONTEXT
        .get_or_init(|| match GpuContext::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                // Stderr only - stdout carries the ordered report lines
                eprintln!("GPU initialization failed: {e}");
                None
            }
        })
        .as_ref()
}

/// Check if GPU is available
pub fn is_gpu_available() -> bool {
    get_gpu_context().is_some()
}

/// List every adapter wgpu can see on this host
///
/// This is the source of the report's device count and per-device names.
/// It enumerates across all backends, so a host can report more adapters
/// than physical GPUs (e.g. the same card via Vulkan and GL).
#[must_use]
pub fn enumerate_devices() -> Vec<wgpu::AdapterInfo> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    instance
        .enumerate_adapters(wgpu::Backends::all())
        .iter()
        .map(wgpu::Adapter::get_info)
        .collect()
}
