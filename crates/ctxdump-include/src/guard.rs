//! Cycle guard

use ctxdump_core::TypeHandle;
use std::collections::HashSet;

/// Types already expanded during one traversal
///
/// One guard belongs to one traversal. Concurrent traversals of different
/// roots each need their own instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleGuard {
    ignored: HashSet<TypeHandle>,
}

impl CycleGuard {
    /// Create an empty guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a type must not be expanded again
    pub fn contains(&self, ty: TypeHandle) -> bool {
        self.ignored.contains(&ty)
    }

    /// Mark a type as expanded; returns `false` if it already was
    pub fn mark(&mut self, ty: TypeHandle) -> bool {
        self.ignored.insert(ty)
    }

    /// Number of marked types
    pub fn len(&self) -> usize {
        self.ignored.len()
    }

    /// Whether nothing has been marked
    pub fn is_empty(&self) -> bool {
        self.ignored.is_empty()
    }

    /// Marked types, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = TypeHandle> + '_ {
        self.ignored.iter().copied()
    }
}

impl FromIterator<TypeHandle> for CycleGuard {
    fn from_iter<I: IntoIterator<Item = TypeHandle>>(iter: I) -> Self {
        Self {
            ignored: iter.into_iter().collect(),
        }
    }
}
