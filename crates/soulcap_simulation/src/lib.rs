//! Soulcap Simulation Core
//!
//! Soul Capacity Resource Engine на Bevy 0.16 (headless ECS)
//!
//! Каждое soul-оружие — depletable пул (current/max), который:
//! - тратится по одному на активацию (discrete) или раз в interval (channel)
//! - делится между копиями одного kind в inventory (propagation)
//! - после cooldown'а восстанавливается по линейному ramp'у
//!
//! Host (игра / сервер) шлёт intents и читает notifications через events.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod config;
pub mod item_system;
pub mod logger;
pub mod persistence;
pub mod soak;
pub mod soul;

// Re-export базовых типов для удобства
pub use components::*;
pub use config::SoulConfig;
pub use item_system::{
    ActivationMode, ChannelEffect, DefinitionError, QualityModifier, WeaponClass,
    WeaponDefinition, WeaponDefinitions, WeaponKind,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use persistence::{CarrierSave, PersistenceError, SoulWeaponSave};
pub use soul::{
    remove_soul_weapon, spawn_soul_weapon, ActivateWeaponIntent, ActivationRefused,
    CapacityModifier, ChannelConsumed, ChannelFinished, RefusalReason, SessionEntered,
    SoulChannel, SoulConsumed, SoulPlugin, SoulSet, StartChannelIntent, WeaponEffect,
    WeaponExhausted, WeaponRecovered,
};

/// Главный plugin симуляции
///
/// Tick rate берётся из `SoulConfig` (если host вставил свой — из него).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SoulConfig>()
            .copied()
            .unwrap_or_default();

        app
            // Fixed timestep для simulation tick (все тайминги soul engine в тиках)
            .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            .add_plugins(SoulPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Тики гоняются вручную через `run_fixed_tick`, без wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Один simulation tick (FixedUpdate целиком)
///
/// Events при этом не ротируются: host сам читает/drain'ит notifications.
pub fn run_fixed_tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

/// Snapshot soul state для сравнения детерминизма
///
/// Сортируем по Entity index: порядок query не гарантирован.
pub fn soul_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &SoulWeapon)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, weapon) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(&weapon.current.to_le_bytes());
        snapshot.extend_from_slice(&weapon.cooldown_remaining.to_le_bytes());
        snapshot.extend_from_slice(&weapon.regen_progress().to_le_bytes());
        snapshot.push(weapon.exhausted as u8);
    }

    snapshot
}
