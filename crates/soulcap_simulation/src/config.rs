//! Engine constants (resource)
//!
//! Всё считается в тиках fixed timestep'а, не в секундах:
//! regen curve и cooldown должны быть детерминированы frame-в-frame.

use bevy::prelude::*;
use crate::components::DEFAULT_RECOVERY_COOLDOWN_TICKS;

/// Soul engine configuration
#[derive(Resource, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct SoulConfig {
    /// Частота simulation tick (Hz)
    pub tick_hz: f64,

    /// Cooldown после каждого consume (тики); пока > 0 — regen заморожен
    pub recovery_cooldown_ticks: u32,
}

impl Default for SoulConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            recovery_cooldown_ticks: DEFAULT_RECOVERY_COOLDOWN_TICKS,
        }
    }
}
