use crate::pds::PdsState;
use crate::pds_word::StatusWord;
use crate::prelude::*;

/// Called with the new state, the status word it was decoded from and the
/// subnode it was observed on.
pub type StateCallback = Box<dyn FnMut(PdsState, StatusWord, u8) + Send>;

/// Called with the emergency error code received from the drive.
pub type EmcyCallback = Box<dyn FnMut(u32) + Send>;

/// Handle returned by a subscribe call, needed to unsubscribe.
pub type Slot = usize;

struct Slots<F> {
    next: Slot,
    callbacks: HashMap<Slot, F>,
}

impl<F> Default for Slots<F> {
    fn default() -> Self {
        Slots {
            next: 0,
            callbacks: HashMap::new(),
        }
    }
}

impl<F> Slots<F> {
    fn add(&mut self, cb: F) -> Slot {
        let slot = self.next;
        self.next += 1;
        self.callbacks.insert(slot, cb);
        slot
    }

    fn remove(&mut self, slot: Slot) -> bool {
        self.callbacks.remove(&slot).is_some()
    }
}

/// Registered state change and emergency callbacks of one servo.
#[derive(Default)]
pub struct Subscriptions {
    state: Slots<StateCallback>,
    emcy: Slots<EmcyCallback>,
}

impl Subscriptions {
    pub fn add_state(&mut self, cb: StateCallback) -> Slot {
        self.state.add(cb)
    }

    pub fn remove_state(&mut self, slot: Slot) -> bool {
        self.state.remove(slot)
    }

    pub fn add_emcy(&mut self, cb: EmcyCallback) -> Slot {
        self.emcy.add(cb)
    }

    pub fn remove_emcy(&mut self, slot: Slot) -> bool {
        self.emcy.remove(slot)
    }

    pub fn notify_state(&mut self, state: PdsState, sw: StatusWord, subnode: u8) {
        for cb in self.state.callbacks.values_mut() {
            cb(state, sw, subnode);
        }
    }

    pub fn notify_emcy(&mut self, code: u32) {
        for cb in self.emcy.callbacks.values_mut() {
            cb(code);
        }
    }
}

impl Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("state", &self.state.callbacks.len())
            .field("emcy", &self.emcy.callbacks.len())
            .finish()
    }
}
