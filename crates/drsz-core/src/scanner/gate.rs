//! Admission gate — a counting semaphore that bounds how many subtree
//! walks touch the filesystem at the same time.
//!
//! Workers block in [`AdmissionGate::acquire`] until a slot is free and
//! release it by dropping the returned [`GatePermit`]. The gate also keeps a
//! high-water mark of simultaneously held slots so callers (and tests) can
//! confirm the bound was honoured.

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct GateState {
    in_use: usize,
    peak: usize,
}

#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    state: Mutex<GateState>,
    freed: Condvar,
}

impl AdmissionGate {
    /// Create a gate with `capacity` slots. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(GateState::default()),
            freed: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until a slot is free, then take it.
    pub fn acquire(&self) -> GatePermit<'_> {
        let mut state = self.state.lock();
        while state.in_use >= self.capacity {
            self.freed.wait(&mut state);
        }
        state.in_use += 1;
        state.peak = state.peak.max(state.in_use);
        GatePermit { gate: self }
    }

    #[cfg(test)]
    fn in_use(&self) -> usize {
        self.state.lock().in_use
    }

    /// Largest number of slots ever held at once.
    pub fn peak(&self) -> usize {
        self.state.lock().peak
    }

    fn release(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.in_use > 0, "admission gate released more than acquired");
        state.in_use -= 1;
        drop(state);
        self.freed.notify_one();
    }
}

/// A held admission slot. Dropping it frees the slot.
#[must_use = "dropping the permit immediately releases the slot"]
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a AdmissionGate,
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
