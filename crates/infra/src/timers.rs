use lull_domain::ID;
use std::{collections::HashMap, sync::Mutex};
use tokio::task::JoinHandle;

enum TimerSlot {
    /// Sleeping until the trigger time
    Pending(JoinHandle<()>),
    /// Woke up and is running the fire path. Can no longer be aborted.
    Firing,
}

/// In-flight one shot timers keyed by event id. The store stays the source
/// of truth: a missing entry never means an event was delivered or canceled.
#[derive(Default)]
pub struct TimerRegistry {
    slots: Mutex<HashMap<ID, TimerSlot>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the timer created by `spawn` unless one already exists for
    /// `id`, in which case `spawn` is not called. Returns whether a new timer
    /// was armed.
    pub fn arm_with<F>(&self, id: ID, spawn: F) -> bool
    where
        F: FnOnce() -> JoinHandle<()>,
    {
        let mut slots = self.slots.lock().unwrap();
        if slots.contains_key(&id) {
            return false;
        }
        slots.insert(id, TimerSlot::Pending(spawn()));
        true
    }

    /// Aborts a pending timer. Returns `false` if there was none or if it is
    /// already firing.
    pub fn disarm(&self, id: &ID) -> bool {
        let mut slots = self.slots.lock().unwrap();
        if !matches!(slots.get(id), Some(TimerSlot::Pending(_))) {
            return false;
        }
        if let Some(TimerSlot::Pending(handle)) = slots.remove(id) {
            handle.abort();
        }
        true
    }

    /// Called by a timer when it wakes up. Returns `false` if the timer was
    /// disarmed in the meantime and must not fire.
    pub fn begin_firing(&self, id: &ID) -> bool {
        let mut slots = self.slots.lock().unwrap();
        match slots.get_mut(id) {
            Some(slot) if matches!(slot, TimerSlot::Pending(_)) => {
                *slot = TimerSlot::Firing;
                true
            }
            _ => false,
        }
    }

    /// Forgets the timer once its fire path is done
    pub fn release(&self, id: &ID) {
        self.slots.lock().unwrap().remove(id);
    }

    pub fn is_armed(&self, id: &ID) -> bool {
        self.slots.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
