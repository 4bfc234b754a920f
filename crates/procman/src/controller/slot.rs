use parking_lot::Mutex;

/// The launched child a controller is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildHandle {
    /// OS pid of the child.
    pub pid: u32,
    /// Command line as given to `start`, space separated.
    pub command: String,
}

/// Subprocess state of a controller. One value covers both "is a child
/// running" and "which child", so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChildSlot {
    #[default]
    Idle,
    /// Spawn requested, no child yet.
    Launching { command: String },
    Running(ChildHandle),
}

impl ChildSlot {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    pub fn child(&self) -> Option<&ChildHandle> {
        match self {
            Self::Running(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Exclusive claim on an idle slot. The slot returns to [`ChildSlot::Idle`]
/// when the guard is dropped, whichever way `start` exits.
#[derive(Debug)]
pub(crate) struct SlotGuard<'a> {
    slot: &'a Mutex<ChildSlot>,
}

impl<'a> SlotGuard<'a> {
    /// Move an idle slot to `Launching`, or hand back the busy state.
    pub(crate) fn acquire(slot: &'a Mutex<ChildSlot>, command: &str) -> Result<Self, ChildSlot> {
        let mut state = slot.lock();
        if !state.is_idle() {
            return Err(state.clone());
        }
        *state = ChildSlot::Launching {
            command: command.to_owned(),
        };
        Ok(Self { slot })
    }

    pub(crate) fn running(&self, handle: ChildHandle) {
        *self.slot.lock() = ChildSlot::Running(handle);
    }
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = ChildSlot::Idle;
    }
}
