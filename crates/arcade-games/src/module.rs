//! Game Module contract
//!
//! A game module plugs into the shared runtime through a fixed lifecycle:
//!
//! ```text
//! Unloaded --init--> Ready --start--> Running --stop--> Ready --destroy--> Unloaded
//! ```
//!
//! [`ModuleSlot`] owns a module and enforces the transitions, so repeated or
//! out-of-order calls are no-ops instead of reaching the module. A module
//! that finishes on its own (see [`GameModule::is_finished`]) drops its slot
//! back to `Ready`, matching the stopped loop.

use arcade_runtime::{FrameHandler, Runtime};

/// Static description of a game module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMeta {
    /// Short id used by the registry and deep links
    pub id: &'static str,
    pub title: &'static str,
    /// Store key holding the module's best score
    pub best_score_key: &'static str,
}

/// A mini-game driven by the runtime loop.
///
/// Modules receive the runtime by reference in every call and must not
/// retain anything borrowed from it.
pub trait GameModule: FrameHandler {
    fn meta(&self) -> &'static GameMeta;

    /// Load persisted state and prepare the first frame.
    fn init(&mut self, rt: &mut Runtime);

    /// Attach to the frame loop.
    fn start(&mut self, rt: &mut Runtime);

    /// Detach from the frame loop, keeping state.
    fn stop(&mut self, rt: &mut Runtime);

    /// Release everything acquired since `init`.
    fn destroy(&mut self, rt: &mut Runtime);

    /// Whether the module reached a terminal state that needs a fresh
    /// `destroy`/`init` cycle to play again.
    fn is_finished(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Unloaded,
    Ready,
    Running,
}

/// A module instance plus its lifecycle state.
pub struct ModuleSlot {
    module: Box<dyn GameModule>,
    state: ModuleState,
}

impl ModuleSlot {
    pub fn new(module: Box<dyn GameModule>) -> Self {
        Self {
            module,
            state: ModuleState::Unloaded,
        }
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn meta(&self) -> &'static GameMeta {
        self.module.meta()
    }

    pub fn is_finished(&self) -> bool {
        self.module.is_finished()
    }

    pub fn init(&mut self, rt: &mut Runtime) {
        if self.state != ModuleState::Unloaded {
            return;
        }
        log::debug!("module '{}': init", self.meta().id);
        self.module.init(rt);
        self.state = ModuleState::Ready;
    }

    pub fn start(&mut self, rt: &mut Runtime) {
        if self.state != ModuleState::Ready {
            return;
        }
        log::debug!("module '{}': start", self.meta().id);
        self.module.start(rt);
        if !self.module.is_finished() {
            self.state = ModuleState::Running;
        }
    }

    pub fn stop(&mut self, rt: &mut Runtime) {
        if self.state != ModuleState::Running {
            return;
        }
        log::debug!("module '{}': stop", self.meta().id);
        self.module.stop(rt);
        self.state = ModuleState::Ready;
    }

    /// Destroy the module, stopping it first if it is running.
    pub fn destroy(&mut self, rt: &mut Runtime) {
        self.stop(rt);
        if self.state != ModuleState::Ready {
            return;
        }
        log::debug!("module '{}': destroy", self.meta().id);
        self.module.destroy(rt);
        self.state = ModuleState::Unloaded;
    }
}

/// The loop drives a slot only through its module's frame callbacks.
impl FrameHandler for ModuleSlot {
    fn update(&mut self, rt: &mut Runtime, dt: f32) {
        if self.state != ModuleState::Running {
            return;
        }
        self.module.update(rt, dt);
        if self.module.is_finished() {
            log::debug!("module '{}': finished", self.meta().id);
            self.state = ModuleState::Ready;
        }
    }

    /// Paused modules still draw, so the host can repaint after a resize.
    fn render(&mut self, rt: &mut Runtime) {
        if self.state != ModuleState::Unloaded {
            self.module.render(rt);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    pub type CallLog = Rc<RefCell<Vec<String>>>;

    /// Module that records lifecycle calls as "<id>.<call>".
    ///
    /// Setting `finished` ends the run: the next update stops the loop and
    /// `start` no longer runs it.
    pub struct RecordingModule {
        pub meta: &'static GameMeta,
        pub log: CallLog,
        pub finished: Rc<Cell<bool>>,
    }

    impl RecordingModule {
        pub fn new(meta: &'static GameMeta, log: CallLog) -> Self {
            Self {
                meta,
                log,
                finished: Rc::default(),
            }
        }

        fn record(&self, call: &str) {
            self.log.borrow_mut().push(format!("{}.{call}", self.meta.id));
        }
    }

    impl FrameHandler for RecordingModule {
        fn update(&mut self, rt: &mut Runtime, _dt: f32) {
            self.record("update");
            if self.finished.get() {
                rt.stop();
            }
        }

        fn render(&mut self, _rt: &mut Runtime) {
            self.record("render");
        }
    }

    impl GameModule for RecordingModule {
        fn meta(&self) -> &'static GameMeta {
            self.meta
        }

        fn init(&mut self, _rt: &mut Runtime) {
            self.record("init");
        }

        fn start(&mut self, rt: &mut Runtime) {
            self.record("start");
            if !self.finished.get() {
                rt.run();
            }
        }

        fn stop(&mut self, rt: &mut Runtime) {
            self.record("stop");
            rt.stop();
        }

        fn destroy(&mut self, _rt: &mut Runtime) {
            self.record("destroy");
        }

        fn is_finished(&self) -> bool {
            self.finished.get()
        }
    }
}
