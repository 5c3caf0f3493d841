//! Fullscreen-swap overlay flags and their delayed restore.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub visible: bool,
    pub swap_modal: bool,
    pub buttons_hidden: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            visible: false,
            swap_modal: true,
            buttons_hidden: false,
        }
    }
}

/// Sequences the overlay flags.
///
/// Explicit selection applies synchronously. Departures and manual closes
/// drop `swap_modal` at once and restore it from a one-shot timer, giving
/// the overlay time to animate out. The timer callback must re-check the
/// session's mount guard itself; aborting here is best effort.
#[derive(Debug, Default)]
pub struct SwapSequencer {
    ui: UiState,
    pending: Option<JoinHandle<()>>,
}

impl SwapSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    /// Show the overlay for an explicit selection, superseding any pending restore.
    pub fn select(&mut self) {
        self.cancel_pending();
        self.ui.visible = true;
        self.ui.swap_modal = true;
    }

    pub fn begin_departure(&mut self) {
        self.ui.swap_modal = false;
    }

    pub fn begin_close(&mut self) {
        self.ui.visible = false;
        self.ui.swap_modal = false;
    }

    pub fn complete_revert(&mut self) {
        self.pending = None;
        self.ui.swap_modal = true;
    }

    pub fn hide_buttons(&mut self) {
        self.ui.buttons_hidden = true;
    }

    /// Run `restore` once after `delay`, replacing any earlier pending restore.
    pub fn arm_revert<F>(&mut self, runtime: &Handle, delay: Duration, restore: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel_pending();
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            restore();
        }));
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DELAY: Duration = Duration::from_millis(500);

    #[test]
    fn select_shows_overlay() {
        let mut seq = SwapSequencer::new();
        seq.begin_close();
        seq.select();
        assert!(seq.ui().visible);
        assert!(seq.ui().swap_modal);
    }

    #[test]
    fn close_hides_both_flags() {
        let mut seq = SwapSequencer::new();
        seq.select();
        seq.begin_close();
        assert!(!seq.ui().visible);
        assert!(!seq.ui().swap_modal);
        seq.complete_revert();
        assert!(seq.ui().swap_modal);
        assert!(!seq.ui().visible);
    }

    #[test]
    fn hide_buttons_is_one_way() {
        let mut seq = SwapSequencer::new();
        seq.hide_buttons();
        seq.hide_buttons();
        assert!(seq.ui().buttons_hidden);
    }

    #[tokio::test(start_paused = true)]
    async fn armed_revert_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut seq = SwapSequencer::new();
        let counter = fired.clone();
        seq.arm_revert(&Handle::current(), DELAY, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(seq.has_pending());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(DELAY).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_pending_revert() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut seq = SwapSequencer::new();
        for _ in 0..3 {
            let counter = fired.clone();
            seq.arm_revert(&Handle::current(), DELAY, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn selection_cancels_pending_revert() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut seq = SwapSequencer::new();
        let counter = fired.clone();
        seq.arm_revert(&Handle::current(), DELAY, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        seq.select();
        assert!(!seq.has_pending());

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
