use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use appshell_common::{EngineId, WindowId, WindowMode};
use tracing::debug;

/// Registry-side view of one live window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEntry {
    pub id: WindowId,
    pub mode: WindowMode,
    /// Symbolic name, set only if this window won the name.
    pub name: Option<String>,
    /// Engine currently attached, if any. Back-reference only.
    pub engine: Option<EngineId>,
}

#[derive(Default)]
struct Maps {
    windows: HashMap<WindowId, WindowEntry>,
    names: HashMap<String, WindowId>,
}

/// Maps window identities (and optional symbolic names) to live windows.
///
/// Safe to share across threads. Identity and name maps are updated under
/// one lock so a name never outlives the window it points to.
#[derive(Default)]
pub struct WindowRegistry {
    maps: RwLock<Maps>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new window and return its fresh identity.
    ///
    /// When `name` is already bound the window is still registered, but the
    /// name keeps pointing at the first holder.
    pub fn register(&self, mode: WindowMode, name: Option<&str>) -> WindowId {
        let id = WindowId::new();
        let mut maps = self.write();

        let bound = match name {
            Some(name) if !maps.names.contains_key(name) => {
                maps.names.insert(name.to_string(), id);
                Some(name.to_string())
            }
            Some(name) => {
                debug!(window = %id, name, "name already registered, ignoring");
                None
            }
            None => None,
        };

        maps.windows.insert(
            id,
            WindowEntry {
                id,
                mode,
                name: bound,
                engine: None,
            },
        );
        debug!(window = %id, ?mode, "window registered");
        id
    }

    /// Remove a window. Any name bound to it is released as well.
    pub fn unregister(&self, id: WindowId) -> Option<WindowEntry> {
        let mut maps = self.write();
        let entry = maps.windows.remove(&id)?;
        if let Some(name) = &entry.name {
            if maps.names.get(name) == Some(&id) {
                maps.names.remove(name);
            }
        }
        debug!(window = %id, "window unregistered");
        Some(entry)
    }

    pub fn resolve(&self, id: WindowId) -> Option<WindowEntry> {
        self.read().windows.get(&id).cloned()
    }

    pub fn resolve_by_name(&self, name: &str) -> Option<WindowEntry> {
        let maps = self.read();
        let id = maps.names.get(name)?;
        maps.windows.get(id).cloned()
    }

    /// Record which engine a window holds. Returns `false` for unknown ids.
    pub fn attach_engine(&self, id: WindowId, engine: EngineId) -> bool {
        match self.write().windows.get_mut(&id) {
            Some(entry) => {
                entry.engine = Some(engine);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.read().windows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.read().windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<WindowId> {
        self.read().windows.keys().copied().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Maps> {
        self.maps.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Maps> {
        self.maps.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn register_and_resolve() {
        let registry = WindowRegistry::new();
        let id = registry.register(WindowMode::Normal, None);

        let entry = registry.resolve(id).unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.mode, WindowMode::Normal);
        assert_eq!(entry.name, None);
        assert_eq!(entry.engine, None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolve_unknown_is_none() {
        let registry = WindowRegistry::new();
        assert!(registry.resolve(WindowId::new()).is_none());
        assert!(registry.resolve_by_name("home").is_none());
        assert!(registry.unregister(WindowId::new()).is_none());
    }

    #[test]
    fn first_name_registration_wins() {
        let registry = WindowRegistry::new();
        let first = registry.register(WindowMode::Singleton, Some("home"));
        let second = registry.register(WindowMode::Singleton, Some("home"));

        assert_ne!(first, second);
        assert_eq!(registry.resolve_by_name("home").unwrap().id, first);
        assert_eq!(registry.resolve(second).unwrap().name, None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn unregister_releases_the_name() {
        let registry = WindowRegistry::new();
        let id = registry.register(WindowMode::Normal, Some("reports/daily"));

        let removed = registry.unregister(id).unwrap();
        assert_eq!(removed.name.as_deref(), Some("reports/daily"));
        assert!(registry.resolve(id).is_none());
        assert!(registry.resolve_by_name("reports/daily").is_none());

        let next = registry.register(WindowMode::Normal, Some("reports/daily"));
        assert_eq!(registry.resolve_by_name("reports/daily").unwrap().id, next);
    }

    #[test]
    fn unregistering_a_loser_keeps_the_winner_name() {
        let registry = WindowRegistry::new();
        let winner = registry.register(WindowMode::Normal, Some("docs"));
        let loser = registry.register(WindowMode::Normal, Some("docs"));

        registry.unregister(loser);
        assert_eq!(registry.resolve_by_name("docs").unwrap().id, winner);
    }

    #[test]
    fn attach_engine_updates_entry() {
        let registry = WindowRegistry::new();
        let id = registry.register(WindowMode::Normal, None);

        assert!(registry.attach_engine(id, EngineId(7)));
        assert_eq!(registry.resolve(id).unwrap().engine, Some(EngineId(7)));
        assert!(!registry.attach_engine(WindowId::new(), EngineId(8)));
    }

    #[test]
    fn concurrent_registration_from_many_threads() {
        let registry = Arc::new(WindowRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| registry.register(WindowMode::Normal, Some("shared")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: Vec<WindowId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(registry.len(), 400);

        let named: Vec<_> = ids
            .iter()
            .filter_map(|id| registry.resolve(*id))
            .filter(|e| e.name.is_some())
            .collect();
        assert_eq!(named.len(), 1);
        assert_eq!(registry.resolve_by_name("shared").unwrap().id, named[0].id);
    }
}
