//! Ledger of everything acquired for a mounted view.
//!
//! GPU geometries and materials are registered by the view when it uploads
//! the scene; DOM labels, surfaces and event listeners are registered by the
//! host. Unmount walks the ledger, so anything still live afterwards is a leak.

use log::warn;

/// Stable identifier for an acquired resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    /// Drawing surface (canvas) owned by the renderer.
    Surface,
    /// DOM overlay element.
    Label,
    /// Event listener attached to the window or container.
    Listener,
}

impl ResourceKind {
    /// Whether the renderer must be told to free it.
    pub fn is_gpu(self) -> bool {
        matches!(self, ResourceKind::Geometry | ResourceKind::Material)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: ResourceId,
    kind: ResourceKind,
    name: String,
}

#[derive(Debug, Default)]
pub struct ResourceLedger {
    live: Vec<Entry>,
    next_id: u32,
    released: u64,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly acquired resource.
    pub fn acquire(&mut self, kind: ResourceKind, name: impl Into<String>) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        self.live.push(Entry { id, kind, name: name.into() });
        id
    }

    /// Mark a resource released. Releasing twice is a no-op that returns `None`.
    pub fn release(&mut self, id: ResourceId) -> Option<ResourceKind> {
        let idx = self.live.iter().position(|e| e.id == id)?;
        let entry = self.live.swap_remove(idx);
        self.released += 1;
        Some(entry.kind)
    }

    /// Release everything still live, handing each id to `free` first.
    /// Non-GPU leftovers mean the host skipped its own teardown; they are
    /// logged and dropped.
    pub fn release_all(&mut self, mut free: impl FnMut(ResourceId, ResourceKind)) -> usize {
        let entries = std::mem::take(&mut self.live);
        for entry in &entries {
            if !entry.kind.is_gpu() {
                warn!("releasing leftover {:?} '{}' during unmount", entry.kind, entry.name);
            }
            free(entry.id, entry.kind);
        }
        self.released += entries.len() as u64;
        entries.len()
    }

    pub fn kind(&self, id: ResourceId) -> Option<ResourceKind> {
        self.live.iter().find(|e| e.id == id).map(|e| e.kind)
    }

    pub fn name(&self, id: ResourceId) -> Option<&str> {
        self.live.iter().find(|e| e.id == id).map(|e| e.name.as_str())
    }

    /// Number of live resources.
    pub fn live(&self) -> usize {
        self.live.len()
    }

    /// Number of live resources of one kind.
    pub fn live_of(&self, kind: ResourceKind) -> usize {
        self.live.iter().filter(|e| e.kind == kind).count()
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}
