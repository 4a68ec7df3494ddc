//! Power-session execution guard

/// RAM-retained flag marking that the clock write already ran this session
///
/// On the target this lives in memory that survives a soft reset (watchdog,
/// USB re-enumeration) but not power-off. Here it is process-lifetime state:
/// a new process is a new power session. Once set, there is deliberately no
/// way to clear it.
#[derive(Debug, Default)]
pub struct SessionFlag {
    marked: bool,
}

impl SessionFlag {
    pub fn new() -> Self {
        SessionFlag { marked: false }
    }

    /// Record that the clock write ran (or began) this session
    pub fn mark(&mut self) {
        self.marked = true;
    }

    #[inline]
    pub fn is_marked(&self) -> bool {
        self.marked
    }
}
