//! SIGINT forwarding into the machine's stop signal.

use std::io;
use std::sync::OnceLock;

use sma16_core::StopSignal;

static SIGINT_TARGET: OnceLock<StopSignal> = OnceLock::new();

extern "C" fn handle_sigint(_signum: libc::c_int) {
    if let Some(stop) = SIGINT_TARGET.get() {
        stop.raise();
    }
}

/// Routes SIGINT to `stop`. Only the first installed signal is used.
pub fn install_sigint(stop: StopSignal) -> io::Result<()> {
    if SIGINT_TARGET.set(stop).is_err() {
        tracing::debug!("SIGINT already routed");
        return Ok(());
    }
    register_handler()
}

#[allow(unsafe_code)]
fn register_handler() -> io::Result<()> {
    let handler = handle_sigint as extern "C" fn(libc::c_int);
    // SAFETY: the handler only performs an atomic load and store.
    let previous = unsafe { libc::signal(libc::SIGINT, handler as libc::sighandler_t) };
    if previous == libc::SIG_ERR {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
