//! Binary entry point: run the GPU smoke-test report against stdout.
//!
//! No arguments, no environment variables. Exits 0 on every rendered
//! outcome, including a caught probe failure; only a stdout write error
//! propagates.

use std::io;

fn main() -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    voltmeter::report::run(&mut out)
}
