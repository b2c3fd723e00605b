//! Process-wide plotting context
//!
//! Only one render may use the plotting backend at a time. [`PlotContext`]
//! holds the global lock for as long as it lives and releases it on drop,
//! including on early returns and errors.

use std::sync::{Mutex, MutexGuard, PoisonError};

static PLOT_LOCK: Mutex<()> = Mutex::new(());

/// Exclusive hold on the plotting backend
pub struct PlotContext {
    _guard: MutexGuard<'static, ()>,
}

impl PlotContext {
    /// Block until the plotting backend is free, then take it
    ///
    /// A lock poisoned by a panicking render is recovered: the context
    /// carries no state that a failed render could corrupt.
    pub fn acquire() -> Self {
        let guard = PLOT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        log::debug!("Acquired plotting context");
        Self { _guard: guard }
    }
}

impl Drop for PlotContext {
    fn drop(&mut self) {
        log::debug!("Released plotting context");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_released_on_drop() {
        {
            let _ctx = PlotContext::acquire();
        }
        // Would deadlock if the first guard leaked
        let _ctx = PlotContext::acquire();
    }

    #[test]
    fn test_context_recovers_from_poison() {
        let _ = std::thread::spawn(|| {
            let _ctx = PlotContext::acquire();
            panic!("render failed");
        })
        .join();
        let _ctx = PlotContext::acquire();
    }
}
