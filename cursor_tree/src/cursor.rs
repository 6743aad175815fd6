use core::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::ptr::PSeq;

/// Identity of a container instance, so that cursors from one container are
/// never mistaken for positions of another
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SourceId(u64);

impl SourceId {
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SourceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A bidirectional position in an ordered container, or its end sentinel.
///
/// Cursors are `Copy` handles that do not borrow the container they came
/// from. Navigation and dereferencing go through the container, for example
/// [OrdBase::next](crate::OrdBase::next) and
/// [OrdBase::get_at](crate::OrdBase::get_at). A cursor stays valid across any
/// insertion and across removal of other entries. After its own entry is
/// removed it is stale: dereferencing it returns `None` and navigating from
/// it returns the end sentinel.
///
/// Two cursors are equal if they name the same position of the same
/// container, or are both the end sentinel of the same container.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub(crate) p: Option<PSeq>,
    pub(crate) source: SourceId,
}

impl Cursor {
    /// Returns if this is the end sentinel, which is never dereferenceable
    pub fn is_end(&self) -> bool {
        self.p.is_none()
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.p {
            Some(p) => write!(f, "Cursor({p:?})"),
            None => write!(f, "Cursor(end)"),
        }
    }
}
