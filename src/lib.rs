//! Voltmeter: a GPU stack smoke test
//!
//! Answers one question: is the GPU compute stack on this host actually
//! usable, beyond merely being detected? It reports the tool version,
//! adapter availability, backend/driver details, and the visible adapter
//! list, then uploads a two-element tensor to the GPU, adds it to itself
//! with a compute shader, and reads the result back. Every outcome -
//! including a probe failure - is a console line, and the process exits 0.
//!
//! # Example
//!
//! ```no_run
//! let mut out = Vec::new();
//! voltmeter::report::run(&mut out).unwrap();
//! print!("{}", String::from_utf8_lossy(&out));
//! ```

pub mod error;
pub mod gpu;
pub mod report;

pub use error::{Result, VoltmeterError};
pub use gpu::{GpuBuffer, GpuContext, GpuKernels, is_gpu_available};
pub use report::{DeviceSummary, GpuSnapshot, ProbeOutcome};
