//! Arcade host: owns the runtime, switches between the menu and one active
//! game module at a time.

use std::time::Instant;

use arcade_core::{ArcadeError, Result};
use arcade_runtime::{FrameHandler, Runtime};

use crate::menu::GameMenu;
use crate::module::ModuleSlot;
use crate::registry::GameRegistry;

/// Store key for the persisted mute flag.
pub const MUTED_KEY: &str = "muted";

pub struct Arcade {
    runtime: Runtime,
    registry: GameRegistry,
    active: Option<ModuleSlot>,
    menu: GameMenu,
    muted: bool,
    suspended: bool,
    /// Surface generation last painted while the loop was stopped
    painted_generation: u64,
}

impl Arcade {
    pub fn new(runtime: Runtime, registry: GameRegistry) -> Self {
        Self {
            runtime,
            registry,
            active: None,
            menu: GameMenu::new(),
            muted: true,
            suspended: false,
            painted_generation: 0,
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    pub fn menu(&self) -> &GameMenu {
        &self.menu
    }

    /// Id of the attached game, `None` while the menu is showing.
    pub fn active_id(&self) -> Option<&'static str> {
        self.active.as_ref().map(|slot| slot.meta().id)
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Apply persisted settings and show either the deep-linked game or the menu.
    ///
    /// Audio stays locked here; it is enabled by the first user gesture.
    pub fn mount(&mut self, deep_link: Option<&str>) {
        self.muted = self.runtime.store.get_bool(MUTED_KEY, true);
        if self.muted {
            self.runtime.audio.set_enabled(false);
        }
        match deep_link {
            Some(id) => {
                log::info!("arcade: deep link to '{id}'");
                if let Err(e) = self.select(id) {
                    log::warn!("arcade: {e}, showing menu");
                }
            }
            None => self.show_menu(),
        }
    }

    /// Switch to the game `id`.
    ///
    /// The current game is stopped and destroyed before the new one is
    /// initialized and started. Unknown ids fall back to the menu and
    /// report [`ArcadeError::UnknownGame`].
    pub fn select(&mut self, id: &str) -> Result<()> {
        let Some(module) = self.registry.create(id) else {
            self.show_menu();
            return Err(ArcadeError::UnknownGame(id.to_string()));
        };

        self.detach();
        let mut slot = ModuleSlot::new(module);
        slot.init(&mut self.runtime);
        slot.start(&mut self.runtime);
        log::info!("arcade: switched to '{}'", slot.meta().id);
        self.active = Some(slot);
        if self.suspended {
            self.suspend_active();
        }
        Ok(())
    }

    /// Tear down the active game and show the menu.
    pub fn show_menu(&mut self) {
        self.detach();
        self.runtime.stop();
        self.menu.refresh(&self.registry, &self.runtime.store);
        self.menu.set_muted(self.muted);
        self.menu.render(&mut self.runtime);
        self.painted_generation = self.runtime.surface().generation();
    }

    /// Play the active game again from a fresh `init`.
    ///
    /// While suspended the fresh run is left paused until [`Arcade::resume`].
    pub fn restart(&mut self) {
        let Some(slot) = self.active.as_mut() else {
            return;
        };
        log::debug!("arcade: restarting '{}'", slot.meta().id);
        slot.destroy(&mut self.runtime);
        slot.init(&mut self.runtime);
        slot.start(&mut self.runtime);
        if self.suspended {
            self.suspend_active();
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.runtime.store.set_bool(MUTED_KEY, self.muted);
        self.runtime.audio.set_enabled(!self.muted);
        self.menu.set_muted(self.muted);
        log::info!("arcade: sound {}", if self.muted { "off" } else { "on" });
    }

    /// Call from pointer/key press handlers: the only place audio may start.
    pub fn on_user_gesture(&mut self) {
        if self.muted {
            return;
        }
        if self.runtime.audio.is_enabled() {
            self.runtime.audio.unlock();
        } else {
            self.runtime.audio.set_enabled(true);
        }
    }

    /// Window lost focus: pause the active game and drop held input.
    pub fn suspend(&mut self, now: Instant) {
        if self.suspended {
            return;
        }
        self.suspended = true;
        self.runtime.input.release_all(now);
        self.suspend_active();
    }

    /// Window regained focus: resume the active game with a fresh clock.
    pub fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        if let Some(slot) = self.active.as_mut() {
            log::debug!("arcade: resuming '{}'", slot.meta().id);
            slot.start(&mut self.runtime);
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Drive one frame: host controls first, then the active game or the menu.
    pub fn frame(&mut self, now: Instant) {
        self.handle_controls();

        let ran = match self.active.as_mut() {
            Some(slot) => self.runtime.frame(now, slot),
            None => self.runtime.frame(now, &mut self.menu),
        };

        // A stopped loop leaves the surface alone, except after a resize
        // wiped it; repaint once in that case.
        let generation = self.runtime.surface().generation();
        if ran {
            self.painted_generation = generation;
        } else if generation != self.painted_generation {
            match self.active.as_mut() {
                Some(slot) => slot.render(&mut self.runtime),
                None => self.menu.render(&mut self.runtime),
            }
            self.painted_generation = generation;
        }
    }

    fn handle_controls(&mut self) {
        let input = &self.runtime.input;
        let mute = input.is_action_just_pressed("mute");
        let back = input.is_action_just_pressed("back");
        let retry = input.is_action_just_pressed("restart") || input.pointer().just_pressed;

        if mute {
            self.toggle_mute();
            if self.active.is_none() {
                self.menu.render(&mut self.runtime);
            }
        }

        let finished = self.active.as_ref().map(ModuleSlot::is_finished);
        match finished {
            Some(_) if back => self.show_menu(),
            Some(true) if retry => self.restart(),
            Some(_) => {}
            None => {
                if let Some(id) = self.menu.selection(&self.runtime) {
                    if let Err(e) = self.select(id) {
                        log::warn!("arcade: {e}");
                    }
                }
            }
        }
    }

    fn suspend_active(&mut self) {
        if let Some(slot) = self.active.as_mut() {
            log::debug!("arcade: suspending '{}'", slot.meta().id);
            slot.stop(&mut self.runtime);
        }
    }

    fn detach(&mut self) {
        if let Some(mut previous) = self.active.take() {
            previous.destroy(&mut self.runtime);
            log::debug!("arcade: detached '{}'", previous.meta().id);
        }
    }
}
