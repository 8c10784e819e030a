//! SoulWeapon — per-instance soul capacity state machine
//!
//! Инвариант: 0 ≤ current ≤ max_capacity (max пересчитывается каждый read)
//! Инвариант: current == 0 ⇒ exhausted
//! Exhausted снимается ТОЛЬКО завершением regen цикла.
//!
//! Capabilities:
//! - `Consumable` — gate + consume (один soul за событие)
//! - `Regenerating` — cooldown + resumable regen ramp (раз в тик)

use bevy::prelude::*;
use crate::components::carrier::EquipmentMultiplier;
use crate::item_system::{WeaponDefinition, WeaponKind};
use crate::soul::capacity::{max_capacity, ramp_capacity, ramp_floor};

/// Cooldown по умолчанию после consume (5 sec × 60 Hz)
pub const DEFAULT_RECOVERY_COOLDOWN_TICKS: u32 = 5 * 60;

/// Activation gate + consumption
pub trait Consumable {
    /// `!exhausted` — host обязан проверить перед любой активацией
    fn can_activate(&self) -> bool;

    /// Забрать один soul. No-op на exhausted instance (возвращает false).
    fn consume(&mut self) -> bool;
}

/// Cooldown + regen, вызывается раз в simulation tick
pub trait Regenerating {
    fn regen_tick(&mut self, max_capacity: u32) -> RegenOutcome;
}

/// Что произошло за один regen tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenOutcome {
    /// Cooldown ещё идёт (декрементирован)
    Cooling,
    /// Уже полный, делать нечего
    Full,
    /// Ramp продвинулся
    Regenerating,
    /// Цикл завершён: current = max, exhausted снят
    Recovered,
}

/// Ready / Exhausted (Cooling — ортогональный флаг, см. `is_cooling`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SoulState {
    Ready,
    Exhausted,
}

/// Soul capacity одного instance оружия
///
/// Живёт на entity предмета. Carrier владеет списком entities через
/// `SoulInventory`; обратной ссылки instance → inventory нет.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SoulWeapon {
    /// Propagation key
    pub kind: WeaponKind,

    /// Capacity до модификаторов (> 0)
    pub base_capacity: u32,

    /// Тики на полный regen 0 → max (без cooldown)
    pub regen_duration_ticks: u32,

    /// Cooldown выставляемый каждым consume
    pub recovery_cooldown_ticks: u32,

    /// Quality (prefix) multiplier — единственное persisted поле
    pub quality_multiplier: f32,

    pub current: u32,
    pub exhausted: bool,
    pub cooldown_remaining: u32,

    // Не persisted, живёт только в сессии
    regen_progress: u32,
}

impl SoulWeapon {
    pub fn new(kind: impl Into<WeaponKind>, base_capacity: u32, regen_duration_ticks: u32) -> Self {
        let mut weapon = Self {
            kind: kind.into(),
            base_capacity,
            regen_duration_ticks,
            recovery_cooldown_ticks: DEFAULT_RECOVERY_COOLDOWN_TICKS,
            quality_multiplier: 1.0,
            current: 0,
            exhausted: false,
            cooldown_remaining: 0,
            regen_progress: 0,
        };
        weapon.refill(EquipmentMultiplier::default());
        weapon
    }

    /// Instance из definition, полный относительно текущего equipment multiplier
    pub fn from_definition(def: &WeaponDefinition, equipment: EquipmentMultiplier) -> Self {
        let mut weapon = Self::new(def.kind.clone(), def.base_capacity, def.regen_duration_ticks);
        weapon.refill(equipment);
        weapon
    }

    pub fn with_recovery_cooldown(mut self, ticks: u32) -> Self {
        self.recovery_cooldown_ticks = ticks;
        self
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn quality_multiplier(&self) -> f32 {
        self.quality_multiplier
    }

    pub fn regen_progress(&self) -> u32 {
        self.regen_progress
    }

    /// floor(base × quality × equipment), минимум 1
    pub fn max_capacity(&self, equipment: EquipmentMultiplier) -> u32 {
        max_capacity(self.base_capacity, self.quality_multiplier, equipment.0)
    }

    pub fn state(&self) -> SoulState {
        if self.exhausted {
            SoulState::Exhausted
        } else {
            SoulState::Ready
        }
    }

    pub fn is_cooling(&self) -> bool {
        self.cooldown_remaining > 0
    }

    /// Единственная точка мутации quality multiplier.
    /// Повторное назначение перезаписывает, не компаундит.
    pub fn apply_quality_multiplier(&mut self, value: f32) {
        self.quality_multiplier = value;
    }

    /// Полный refill (создание / вход carrier'а в сессию)
    pub fn refill(&mut self, equipment: EquipmentMultiplier) {
        self.current = self.max_capacity(equipment);
        self.exhausted = false;
        self.cooldown_remaining = 0;
        self.regen_progress = 0;
    }

    /// Snapshot для UI (форматирование — не наша забота)
    pub fn readout(&self, equipment: EquipmentMultiplier) -> SoulReadout {
        SoulReadout {
            current: self.current,
            max: self.max_capacity(equipment),
            exhausted: self.exhausted,
            quality_bonus_percent: ((self.quality_multiplier - 1.0) * 100.0).round() as i32,
        }
    }
}

impl Consumable for SoulWeapon {
    fn can_activate(&self) -> bool {
        !self.exhausted
    }

    fn consume(&mut self) -> bool {
        if self.exhausted {
            // Gate должен был отсечь; для host'а это не фатально
            crate::logger::log_warning(&format!(
                "consume() on exhausted {} ignored",
                self.kind
            ));
            return false;
        }

        self.current = self.current.saturating_sub(1);
        self.cooldown_remaining = self.recovery_cooldown_ticks;
        if self.current == 0 {
            self.exhausted = true;
        }
        true
    }
}

impl SoulWeapon {
    /// Consume, пришедший от sibling'а (propagation)
    ///
    /// В отличие от `consume` не отсекает exhausted instance: общий reserve
    /// сливается на всех копиях, cooldown перезапускается даже на пустой.
    pub fn drain_from_sibling(&mut self) {
        self.current = self.current.saturating_sub(1);
        self.cooldown_remaining = self.recovery_cooldown_ticks;
        if self.current == 0 {
            self.exhausted = true;
        }
    }
}

impl Regenerating for SoulWeapon {
    fn regen_tick(&mut self, max_capacity: u32) -> RegenOutcome {
        let max_capacity = max_capacity.max(1);

        // Max мог упасть (сняли gear) — держим current ≤ max
        if self.current > max_capacity {
            self.current = max_capacity;
        }

        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
            return RegenOutcome::Cooling;
        }

        if self.current >= max_capacity {
            if self.exhausted {
                // Max сжался до current — цикл считается завершённым
                self.exhausted = false;
                self.regen_progress = 0;
                return RegenOutcome::Recovered;
            }
            return RegenOutcome::Full;
        }

        let duration = self.regen_duration_ticks.max(1);

        // Re-sync ramp после внешнего drain'а
        let floor = ramp_floor(self.current, max_capacity, duration);
        if self.regen_progress < floor {
            self.regen_progress = floor;
        }
        self.regen_progress += 1;

        // Regen монотонный: никогда не понижает current
        let candidate = ramp_capacity(self.regen_progress, duration, max_capacity);
        if candidate > self.current {
            self.current = candidate;
        }

        if self.regen_progress >= duration {
            self.current = max_capacity;
            self.exhausted = false;
            self.regen_progress = 0;
            return RegenOutcome::Recovered;
        }

        RegenOutcome::Regenerating
    }
}

/// Read-only snapshot для tooltip collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoulReadout {
    pub current: u32,
    pub max: u32,
    pub exhausted: bool,
    /// +15 для ×1.15, -10 для ×0.9
    pub quality_bonus_percent: i32,
}
