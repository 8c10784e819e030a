//! Channeled Consumption Adapter
//!
//! Для оружия с зажатой кнопкой: вместо одного consume на активацию —
//! consume раз в `floor(base_interval / speed)` тиков пока holder держит.
//!
//! State machine: Idle → Charging → Finished (terminal).
//! Completion (total consumed) репортится ровно один раз.
//!
//! Adapter ничего не знает про ECS: consume + propagation приходит
//! closure'ой от системы (см. `soul::systems::channel`).

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ChannelPhase {
    Idle,
    Charging,
    Finished,
}

/// Входы adapter'а на один тик (читаются у holder'а каждый тик)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelInputs {
    /// Holder всё ещё держит кнопку
    pub held: bool,
    /// Holder может действовать (не crowd-controlled)
    pub can_act: bool,
    /// Attack speed (re-read на каждом reset countdown'а)
    pub speed_multiplier: f32,
    /// Current capacity удерживаемого оружия на начало тика
    pub capacity: u32,
}

/// Результат одного тика
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStep {
    /// Сколько consume произошло за тик (per-consumption hook)
    pub consumed: u32,
    /// Some(total) — channel завершился на этом тике
    pub finished: Option<u32>,
}

/// Channel на carrier'е (пока component висит — channel жив)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SoulChannel {
    /// Удерживаемое оружие
    pub weapon: Entity,
    /// Номинальный interval (use time оружия или override владельца)
    pub base_interval: u32,
    phase: ChannelPhase,
    countdown: i32,
    total_consumed: u32,
}

impl SoulChannel {
    pub fn new(weapon: Entity, base_interval: u32) -> Self {
        Self {
            weapon,
            base_interval,
            phase: ChannelPhase::Idle,
            countdown: 0,
            total_consumed: 0,
        }
    }

    /// floor(base / speed), минимум 1 тик
    pub fn effective_interval(base_interval: u32, speed_multiplier: f32) -> i32 {
        if !speed_multiplier.is_finite() || speed_multiplier <= 0.0 {
            return base_interval.max(1).min(i32::MAX as u32) as i32;
        }
        let ticks = (base_interval as f32 / speed_multiplier) as i64;
        ticks.clamp(1, i32::MAX as i64) as i32
    }

    /// Idle → Charging; первый consume через один полный interval
    pub fn start(&mut self, speed_multiplier: f32) {
        if self.phase != ChannelPhase::Idle {
            return;
        }
        self.phase = ChannelPhase::Charging;
        self.countdown = Self::effective_interval(self.base_interval, speed_multiplier);
    }

    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    pub fn countdown(&self) -> i32 {
        self.countdown
    }

    pub fn total_consumed(&self) -> u32 {
        self.total_consumed
    }

    /// Один тик channel'а
    ///
    /// `consume` — consume + propagation на удерживаемом оружии.
    /// Возвращает remaining capacity, или None если consume не прошёл.
    pub fn tick<F>(&mut self, inputs: ChannelInputs, mut consume: F) -> ChannelStep
    where
        F: FnMut() -> Option<u32>,
    {
        let mut step = ChannelStep::default();
        if self.phase != ChannelPhase::Charging {
            return step;
        }

        let mut remaining = inputs.capacity;

        self.countdown -= 1;
        while self.countdown <= 0 && remaining > 0 {
            match consume() {
                Some(left) => {
                    remaining = left;
                    self.total_consumed += 1;
                    step.consumed += 1;
                    self.countdown =
                        Self::effective_interval(self.base_interval, inputs.speed_multiplier);
                }
                None => {
                    remaining = 0;
                }
            }
        }

        // Termination проверяется каждый тик, независимо от countdown
        if !inputs.held || remaining == 0 || !inputs.can_act {
            self.phase = ChannelPhase::Finished;
            step.finished = Some(self.total_consumed);
        }

        step
    }
}
