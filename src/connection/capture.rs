use crate::batch::BatchHandle;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct Flags {
    active: Option<BatchHandle>,
    capture: bool,
    batch_request: bool,
}

/// Per-connection batch flags. Embed one in any [`super::BatchConnection`]
/// implementation.
#[derive(Debug, Default)]
pub struct CaptureState {
    flags: RwLock<Flags>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active_batch(&self, batch: Option<BatchHandle>) {
        self.write(|f| f.active = batch);
    }

    pub fn active_batch(&self) -> Option<BatchHandle> {
        self.read(|f| f.active.clone())
    }

    pub fn set_capture(&self, capture: bool) {
        self.write(|f| f.capture = capture);
    }

    pub fn is_capturing(&self) -> bool {
        self.read(|f| f.capture)
    }

    pub fn set_batch_request_mode(&self, enabled: bool) {
        self.write(|f| f.batch_request = enabled);
    }

    pub fn batch_request_mode(&self) -> bool {
        self.read(|f| f.batch_request)
    }

    fn read<T>(&self, f: impl FnOnce(&Flags) -> T) -> T {
        let flags = self.flags.read().unwrap_or_else(PoisonError::into_inner);
        f(&flags)
    }

    fn write(&self, f: impl FnOnce(&mut Flags)) {
        let mut flags = self.flags.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_start_cleared() {
        let state = CaptureState::new();
        assert!(state.active_batch().is_none());
        assert!(!state.is_capturing());
        assert!(!state.batch_request_mode());
    }

    #[test]
    fn test_flags_are_independent() {
        let state = CaptureState::new();
        state.set_capture(true);
        state.set_batch_request_mode(true);
        state.set_capture(false);
        assert!(state.batch_request_mode());
        assert!(!state.is_capturing());
    }
}
