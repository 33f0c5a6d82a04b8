//! The diagnostic reporter
//!
//! Splits the smoke test into two halves so the branching can be tested
//! without a GPU attached:
//! - [`GpuSnapshot::capture`] queries the live GPU stack once.
//! - [`render`] turns a snapshot plus a probe closure into the ordered
//!   report lines, writing them to any `io::Write` sink.
//!
//! [`run`] wires the two together with the real probe and is what the
//! binary calls.

use std::io::{self, Write};

use crate::error::Result;
use crate::gpu::{self, GpuBuffer, GpuKernels};

/// One visible GPU adapter, as enumerated across all backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    /// Zero-based index in enumeration order
    pub index: usize,
    /// Adapter name as reported by the driver
    pub name: String,
    /// Backend the adapter was enumerated through (Vulkan, Metal, ...)
    pub backend: String,
}

/// Captured view of everything the report queries
///
/// Rendering is a pure function of this snapshot (plus the probe result),
/// so running the reporter twice against an unchanged host produces
/// line-for-line identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuSnapshot {
    /// This crate's version string
    pub version: String,
    /// Whether a high-performance adapter and device could be acquired
    pub available: bool,
    /// Backend of the selected adapter, when available
    pub backend: Option<String>,
    /// Driver description of the selected adapter, when available
    pub driver: Option<String>,
    /// Every adapter visible on this host
    pub devices: Vec<DeviceSummary>,
    /// Index of the selected adapter within `devices`
    pub current: Option<usize>,
}

impl GpuSnapshot {
    /// Query the live GPU stack
    ///
    /// Initializes the global GPU context on first call. Adapter
    /// enumeration only happens when the context came up, mirroring the
    /// report's branching: an unavailable stack renders no device lines.
    #[must_use]
    pub fn capture() -> Self {
        let version = env!("CARGO_PKG_VERSION").to_string();

        let Some(ctx) = gpu::get_gpu_context() else {
            return GpuSnapshot {
                version,
                available: false,
                backend: None,
                driver: None,
                devices: Vec::new(),
                current: None,
            };
        };

        let info = ctx.adapter_info();
        let devices: Vec<DeviceSummary> = gpu::enumerate_devices()
            .iter()
            .enumerate()
            .map(|(index, a)| DeviceSummary {
                index,
                name: a.name.clone(),
                backend: format!("{:?}", a.backend),
            })
            .collect();

        let selected_backend = format!("{:?}", info.backend);
        let current = devices
            .iter()
            .position(|d| d.name == info.name && d.backend == selected_backend);

        let driver = format!("{} {}", info.driver, info.driver_info)
            .trim()
            .to_string();

        GpuSnapshot {
            version,
            available: true,
            backend: Some(selected_backend),
            driver: Some(if driver.is_empty() {
                "unknown".to_string()
            } else {
                driver
            }),
            devices,
            current,
        }
    }
}

/// What the probe observed on the device
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    /// The values read back right after the host→GPU upload
    pub uploaded: Vec<f32>,
    /// The values read back after the element-wise self-add
    pub sum: Vec<f32>,
}

/// Allocate `[1.0, 2.0]` on the GPU, read it back, add it to itself,
/// and read the sum back
///
/// # Errors
/// Any allocation, transfer, or compute failure surfaces here; the
/// renderer embeds the error text in the failure line.
pub fn run_probe() -> Result<ProbeOutcome> {
    let host = [1.0f32, 2.0];

    let buf = GpuBuffer::from_slice(&host)?;
    let uploaded = buf.to_vec()?;

    let sum_buf = GpuKernels::add(&buf, &buf)?;
    let sum = sum_buf.to_vec()?;

    Ok(ProbeOutcome { uploaded, sum })
}

/// Write the ordered report for a snapshot
///
/// The probe closure runs only when at least one adapter is visible. Its
/// `Err` replaces the success lines with a single failure line embedding
/// the error text - the report itself still completes normally.
///
/// # Errors
/// Only io errors from the sink propagate.
pub fn render<W: Write>(
    out: &mut W,
    snap: &GpuSnapshot,
    probe: impl FnOnce() -> Result<ProbeOutcome>,
) -> io::Result<()> {
    writeln!(out, "Voltmeter version: {}", snap.version)?;
    writeln!(out, "Is a GPU available to Voltmeter? : {}", snap.available)?;

    if snap.available {
        writeln!(
            out,
            "GPU backend in use: {} (driver: {})",
            snap.backend.as_deref().unwrap_or("unknown"),
            snap.driver.as_deref().unwrap_or("unknown"),
        )?;
        writeln!(
            out,
            "Number of GPU adapters available: {}",
            snap.devices.len()
        )?;

        if snap.devices.is_empty() {
            writeln!(out, "Voltmeter sees a GPU backend but no adapters.")?;
        } else {
            writeln!(
                out,
                "Current GPU adapter: {}",
                snap.current.unwrap_or_default()
            )?;
            writeln!(out, "Adapter name: {}", snap.devices[0].name)?;

            writeln!(out, "Attempting simple GPU tensor operation...")?;
            match probe() {
                Ok(outcome) => {
                    writeln!(
                        out,
                        "Tensor successfully created on GPU: {:?}",
                        outcome.uploaded
                    )?;
                    writeln!(out, "Computation on GPU successful: {:?}", outcome.sum)?;
                    writeln!(out, "Simple Voltmeter GPU test PASSED!")?;
                }
                Err(e) => {
                    writeln!(out, "!!! GPU runtime error during simple operation: {e}")?;
                }
            }
        }
    } else {
        writeln!(
            out,
            "!!! No GPU is available to Voltmeter. Check installation and drivers."
        )?;
    }

    Ok(())
}

/// Capture the live state and render the report with the real probe
///
/// # Errors
/// Only io errors from the sink propagate; probe failures are rendered,
/// not returned.
pub fn run<W: Write>(out: &mut W) -> io::Result<()> {
    let snapshot = GpuSnapshot::capture();
    render(out, &snapshot, run_probe)
}
