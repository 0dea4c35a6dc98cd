//! Game registry: maps short ids to lazily constructed modules

use crate::dash::{DashConfig, DashGame, DASH_META};
use crate::module::{GameMeta, GameModule};

type Constructor = Box<dyn Fn() -> Box<dyn GameModule>>;

struct Entry {
    meta: &'static GameMeta,
    constructor: Constructor,
}

/// Ordered set of available games.
///
/// Metadata is available without constructing a module; modules are only
/// built when selected.
#[derive(Default)]
pub struct GameRegistry {
    entries: Vec<Entry>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing every built-in game.
    pub fn builtin(dash: DashConfig) -> Self {
        let mut registry = Self::new();
        registry.register(&DASH_META, move || Box::new(DashGame::new(dash.clone())));
        registry
    }

    /// Register a game. A later registration with the same id replaces the earlier one.
    pub fn register(
        &mut self,
        meta: &'static GameMeta,
        constructor: impl Fn() -> Box<dyn GameModule> + 'static,
    ) {
        let entry = Entry {
            meta,
            constructor: Box::new(constructor),
        };
        match self.entries.iter_mut().find(|e| e.meta.id == meta.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.meta.id == id)
    }

    pub fn meta(&self, id: &str) -> Option<&'static GameMeta> {
        self.entries.iter().find(|e| e.meta.id == id).map(|e| e.meta)
    }

    /// Metadata for every game, in registration order.
    pub fn metas(&self) -> impl Iterator<Item = &'static GameMeta> + '_ {
        self.entries.iter().map(|e| e.meta)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Construct a fresh module instance, or `None` for an unknown id.
    pub fn create(&self, id: &str) -> Option<Box<dyn GameModule>> {
        self.entries
            .iter()
            .find(|e| e.meta.id == id)
            .map(|e| (e.constructor)())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_contains_dash() {
        let registry = GameRegistry::builtin(DashConfig::default());
        assert!(registry.contains("dash"));
        assert_eq!(registry.meta("dash").map(|m| m.best_score_key), Some("best.dash"));
        let module = registry.create("dash").expect("dash should construct");
        assert_eq!(module.meta().id, "dash");
    }

    #[test]
    fn unknown_id_is_none() {
        let registry = GameRegistry::builtin(DashConfig::default());
        assert!(!registry.contains("pong"));
        assert!(registry.meta("pong").is_none());
        assert!(registry.create("pong").is_none());
    }

    #[test]
    fn reregistering_replaces() {
        let mut registry = GameRegistry::builtin(DashConfig::default());
        registry.register(&DASH_META, || Box::new(DashGame::new(DashConfig::default())));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.metas().map(|m| m.id).collect::<Vec<_>>(), vec!["dash"]);
    }
}
