use crate::apply::CancelToken;
use std::io;

/// Cancels `cancel` when the process receives SIGINT or SIGTERM, so a
/// running tool is killed and its response still gets recorded.
#[cfg(unix)]
pub fn cancel_on_termination(cancel: CancelToken) -> io::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use std::thread;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    thread::spawn(move || {
        for _ in signals.forever() {
            cancel.cancel();
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn cancel_on_termination(_cancel: CancelToken) -> io::Result<()> {
    Ok(())
}
