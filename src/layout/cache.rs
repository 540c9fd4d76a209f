// Thu Oct 15 2026 - Alex

use crate::hierarchy::ClassId;
use crate::layout::Layout;
use crate::vtable::VtableSpec;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Memoized layouts keyed by (class, most-derived) and vtable sets keyed by
/// most-derived class. Cleared whenever the hierarchy changes.
pub struct LayoutCache {
    layouts: RwLock<HashMap<(ClassId, bool), Arc<Layout>>>,
    vtables: RwLock<HashMap<ClassId, Arc<Vec<VtableSpec>>>>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            layouts: RwLock::new(HashMap::new()),
            vtables: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_layout(&self, class: ClassId, most_derived: bool) -> Option<Arc<Layout>> {
        self.layouts.read().get(&(class, most_derived)).cloned()
    }

    pub fn insert_layout(&self, layout: Arc<Layout>) {
        self.layouts
            .write()
            .insert((layout.class(), layout.is_most_derived()), layout);
    }

    pub fn get_vtables(&self, class: ClassId) -> Option<Arc<Vec<VtableSpec>>> {
        self.vtables.read().get(&class).cloned()
    }

    pub fn insert_vtables(&self, class: ClassId, vtables: Arc<Vec<VtableSpec>>) {
        self.vtables.write().insert(class, vtables);
    }

    pub fn clear(&self) {
        self.layouts.write().clear();
        self.vtables.write().clear();
    }

    pub fn size(&self) -> usize {
        self.layouts.read().len() + self.vtables.read().len()
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}
