//! Soul engine events
//!
//! # Host → engine (intents)
//! - `ActivateWeaponIntent` — discrete активация (один consume)
//! - `StartChannelIntent` — начать channel на зажатой кнопке
//! - `SessionEntered` — carrier (пере)вошёл в сессию → full refill
//!
//! # Engine → host (notifications)
//! - `SoulConsumed`, `WeaponExhausted`, `WeaponRecovered` — UI/звук
//! - `ActivationRefused` — gate закрыт
//! - `ChannelConsumed` / `ChannelFinished` — hooks channel adapter'а
//! - `WeaponEffect` — projectile collaborator должен сработать

use bevy::prelude::*;

// ============================================================================
// Intents
// ============================================================================

/// Discrete активация оружия из inventory carrier'а
#[derive(Event, Debug, Clone)]
pub struct ActivateWeaponIntent {
    pub carrier: Entity,
    pub weapon: Entity,
}

/// Начать channel
///
/// `base_interval` = None → use time оружия из definition.
#[derive(Event, Debug, Clone)]
pub struct StartChannelIntent {
    pub carrier: Entity,
    pub weapon: Entity,
    pub base_interval: Option<u32>,
}

/// Carrier вошёл в play session (load / respawn в мир)
#[derive(Event, Debug, Clone)]
pub struct SessionEntered {
    pub carrier: Entity,
}

// ============================================================================
// Notifications
// ============================================================================

/// Discrete consume прошёл
#[derive(Event, Debug, Clone)]
pub struct SoulConsumed {
    pub carrier: Entity,
    pub weapon: Entity,
    pub remaining: u32,
    pub siblings_drained: usize,
}

/// Оружие только что стало exhausted
#[derive(Event, Debug, Clone)]
pub struct WeaponExhausted {
    pub carrier: Entity,
    pub weapon: Entity,
}

/// Regen цикл завершён (полный, exhausted снят)
#[derive(Event, Debug, Clone)]
pub struct WeaponRecovered {
    pub carrier: Entity,
    pub weapon: Entity,
}

/// Почему активация не прошла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// Оружие не в inventory этого carrier'а
    NotCarried,
    /// Нет definition для kind
    UnknownKind,
    /// Gate закрыт (exhausted)
    Exhausted,
    /// Holder не может действовать
    CrowdControlled,
    /// Discrete intent на channeled оружие (или наоборот)
    WrongMode,
    /// Channel уже идёт
    AlreadyChanneling,
}

#[derive(Event, Debug, Clone)]
pub struct ActivationRefused {
    pub carrier: Entity,
    pub weapon: Entity,
    pub reason: RefusalReason,
}

/// Per-consumption hook channel'а
#[derive(Event, Debug, Clone)]
pub struct ChannelConsumed {
    pub carrier: Entity,
    pub weapon: Entity,
    /// Total consumed на этот момент (включая этот)
    pub total_consumed: u32,
}

/// Completion hook channel'а (ровно один раз на channel)
#[derive(Event, Debug, Clone)]
pub struct ChannelFinished {
    pub carrier: Entity,
    pub weapon: Entity,
    pub total_consumed: u32,
}

/// Эффект оружия для projectile collaborator
///
/// `power` — сколько soul вложено (1 для discrete/per-consumption,
/// total для fire-on-finish).
#[derive(Event, Debug, Clone)]
pub struct WeaponEffect {
    pub carrier: Entity,
    pub weapon: Entity,
    pub power: u32,
}
