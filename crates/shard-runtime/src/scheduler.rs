//! Frame scheduling: registration of the next per-refresh callback

use std::cell::RefCell;
use std::rc::Rc;

/// Opaque token for one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Source of display-refresh callbacks.
///
/// `request_frame` registers interest in exactly one future callback. The
/// host invokes `GameLoop::on_frame` with the returned handle when that
/// callback fires.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Default)]
struct ManualSchedulerState {
    next_id: u64,
    pending: Option<FrameHandle>,
    requests: u64,
    cancellations: u64,
}

/// Scheduler whose callbacks are fired by hand.
///
/// Clones share state, so the host keeps one handle to read `pending()` while
/// the loop owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualSchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle waiting to be fired, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.state.borrow().pending
    }

    /// Total number of registrations made
    pub fn requests(&self) -> u64 {
        self.state.borrow().requests
    }

    /// Total number of registrations cancelled
    pub fn cancellations(&self) -> u64 {
        self.state.borrow().cancellations
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.requests += 1;
        let handle = FrameHandle(state.next_id);
        state.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(handle) {
            state.pending = None;
            state.cancellations += 1;
        }
    }
}
