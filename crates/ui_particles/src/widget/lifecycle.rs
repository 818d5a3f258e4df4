//! Widget lifecycle state
//!
//! `Uninitialized -> Initialized -> Active <-> Inactive -> Released`.
//! `Released` is terminal; every other state can be released.

use std::fmt;

/// Current state of a particle widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// No simulation yet; initialization is retried on the next paint
    #[default]
    Uninitialized,
    /// Simulation spawned, not yet running
    Initialized,
    /// Simulation running and rendered
    Active,
    /// Simulation stopped; nothing is rendered
    Inactive,
    /// Resources dropped; the widget is dead
    Released,
}

impl fmt::Display for WidgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Released => "released",
        };
        f.write_str(name)
    }
}

/// Lifecycle bookkeeping of one widget
#[derive(Debug, Clone, Default)]
pub struct WidgetLifecycle {
    state: WidgetState,
    /// Activate on the next transform update
    auto_activate_pending: bool,
    /// Paints seen in the current state
    state_paints: u64,
    /// Failed spawn attempts since the last success
    failed_spawns: u32,
}

impl WidgetLifecycle {
    /// Create a new lifecycle in `Uninitialized`
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// Set the state; leaving `Released` is refused
    pub fn set_state(&mut self, new_state: WidgetState) {
        if self.state == WidgetState::Released || self.state == new_state {
            return;
        }
        log::debug!("Widget lifecycle: {} -> {}", self.state, new_state);
        self.state = new_state;
        self.state_paints = 0;
    }

    /// Record a successful spawn and arm auto activation if requested
    pub fn initialized(&mut self, auto_activate: bool) {
        if self.is_released() {
            return;
        }
        self.failed_spawns = 0;
        self.auto_activate_pending = auto_activate;
        self.set_state(WidgetState::Initialized);
    }

    /// Record a failed spawn; the state stays `Uninitialized`
    pub fn spawn_failed(&mut self) -> u32 {
        self.failed_spawns = self.failed_spawns.saturating_add(1);
        self.failed_spawns
    }

    /// Consume a pending auto activation
    pub fn take_auto_activation(&mut self) -> bool {
        std::mem::take(&mut self.auto_activate_pending)
    }

    /// Re-arm or disarm auto activation; only effective before the first activation
    pub fn set_auto_activation(&mut self, armed: bool) {
        if self.state == WidgetState::Initialized {
            self.auto_activate_pending = armed;
        }
    }

    /// Whether auto activation is still armed
    pub fn is_auto_activation_pending(&self) -> bool {
        self.auto_activate_pending
    }

    /// Count one paint in the current state
    pub fn paint(&mut self) -> u64 {
        self.state_paints += 1;
        self.state_paints
    }

    /// Paints seen in the current state
    pub fn state_paints(&self) -> u64 {
        self.state_paints
    }

    /// Whether a simulation exists
    pub fn is_initialized(&self) -> bool {
        matches!(
            self.state,
            WidgetState::Initialized | WidgetState::Active | WidgetState::Inactive
        )
    }

    /// Whether particles are rendered
    pub fn is_active(&self) -> bool {
        self.state == WidgetState::Active
    }

    /// Whether the widget is dead
    pub fn is_released(&self) -> bool {
        self.state == WidgetState::Released
    }

    /// Enter `Active`
    pub fn activate(&mut self) {
        if self.is_initialized() {
            self.auto_activate_pending = false;
            self.set_state(WidgetState::Active);
        }
    }

    /// Enter `Inactive`
    pub fn deactivate(&mut self) {
        if self.is_initialized() {
            self.auto_activate_pending = false;
            self.set_state(WidgetState::Inactive);
        }
    }

    /// Enter `Released`
    pub fn release(&mut self) {
        self.auto_activate_pending = false;
        self.set_state(WidgetState::Released);
    }
}
