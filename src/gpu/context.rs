//! GPU context management
//!
//! The `GpuContext` holds the wgpu device and queue, which are needed
//! for all GPU operations. Think of it as your "connection" to the GPU.

use wgpu::PipelineCompilationOptions;

use crate::error::{Result, VoltmeterError};

/// Manages the GPU device, queue, and the compiled compute pipeline
pub struct GpuContext {
    /// The GPU device - represents the actual hardware
    device: wgpu::Device,
    /// Command queue - where we submit work to the GPU
    queue: wgpu::Queue,
    /// Adapter info for the availability/device report
    adapter_info: wgpu::AdapterInfo,
    /// Pre-compiled element-wise add pipeline
    add_pipeline: wgpu::ComputePipeline,
}

impl GpuContext {
    /// Initialize the GPU context
    ///
    /// This is an expensive operation that:
    /// 1. Finds a suitable GPU adapter
    /// 2. Creates a device and queue
    /// 3. Compiles the element-wise add shader
    ///
    /// # Errors
    /// Returns `AdapterRequest` when no adapter can be acquired and
    /// `DeviceInit` when device creation fails.
    pub fn new() -> Result<Self> {
        // wgpu is async, but we want a sync API for simplicity
        // pollster::block_on runs async code synchronously
        pollster::block_on(Self::new_async())
    }

    async fn new_async() -> Result<Self> {
        // Step 1: Create a wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(), // Try all available backends (Vulkan, Metal, DX12, etc.)
            ..Default::default()
        });

        // Step 2: Request an adapter (represents a physical GPU)
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None, // We don't need a surface for compute
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| VoltmeterError::AdapterRequest(e.to_string()))?;

        let adapter_info = adapter.get_info();

        // Step 3: Request a device (logical connection to the GPU)
        let device_descriptor = wgpu::DeviceDescriptor {
            label: Some("Voltmeter GPU Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            ..Default::default()
        };

        let (device, queue) = adapter
            .request_device(&device_descriptor)
            .await
            .map_err(|e| VoltmeterError::DeviceInit(e.to_string()))?;

        // Step 4: Compile the probe's compute shader
        let add_pipeline = Self::create_add_pipeline(&device);

        Ok(Self {
            device,
            queue,
            adapter_info,
            add_pipeline,
        })
    }

    /// Get the GPU device name for display
    pub fn device_name(&self) -> &str {
        &self.adapter_info.name
    }

    /// Get the adapter info of the selected GPU
    pub const fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Get a reference to the wgpu device
    pub const fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Get a reference to the command queue
    pub const fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Get the compiled element-wise add pipeline
    pub const fn add_pipeline(&self) -> &wgpu::ComputePipeline {
        &self.add_pipeline
    }

    /// Compile the element-wise shader into the add pipeline
    fn create_add_pipeline(device: &wgpu::Device) -> wgpu::ComputePipeline {
        let elementwise_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Elementwise Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/elementwise.wgsl").into()),
        });

        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Add Pipeline"),
            layout: None, // Auto-generate layout from shader
            module: &elementwise_shader,
            entry_point: Some("add"),
            compilation_options: PipelineCompilationOptions::default(),
            cache: None,
        })
    }
}
