//! Soul Capacity Resource Engine
//!
//! Архитектура:
//! - `capacity` — чистая математика max capacity и regen ramp
//! - `modifiers` — equipment multiplier fold + quality prefix
//! - `propagation` — общий reserve между копиями одного kind
//! - `channel` — channeled consumption adapter
//! - `events` — intents от host'а, notifications обратно
//! - `systems` — FixedUpdate системы
//!
//! Порядок тика (SoulSet, chain):
//! 1. Modifiers — reset-then-fold equipment multiplier
//! 2. Session — full refill на SessionEntered
//! 3. Consumption — discrete активации, старт channel'ов, channel тики
//! 4. Regeneration — cooldown + ramp (после всех consume этого тика)

use bevy::prelude::*;
use crate::components::{
    AttackSpeed, ChannelInput, CrowdControlled, EquipmentMultiplier, EquippedSoulGear,
    SoulCarrier, SoulInventory, SoulWeapon,
};
use crate::config::SoulConfig;
use crate::item_system::{QualityModifier, WeaponDefinitions, WeaponKind};

pub mod capacity;
pub mod channel;
pub mod events;
pub mod modifiers;
pub mod propagation;
pub mod systems;

pub use capacity::*;
pub use channel::*;
pub use events::*;
pub use modifiers::*;
pub use propagation::*;
pub use systems::*;

/// Фазы soul engine внутри FixedUpdate
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoulSet {
    Modifiers,
    Session,
    Consumption,
    Regeneration,
}

/// Soul engine plugin
///
/// Регистрирует events, resources и системы. `WeaponDefinitions` с
/// templates вставляется только если host не положил свой registry.
pub struct SoulPlugin;

impl Plugin for SoulPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SoulWeapon>()
            .register_type::<SoulCarrier>()
            .register_type::<SoulInventory>()
            .register_type::<EquipmentMultiplier>()
            .register_type::<EquippedSoulGear>()
            .register_type::<AttackSpeed>()
            .register_type::<ChannelInput>()
            .register_type::<CrowdControlled>()
            .register_type::<SoulChannel>()
            .register_type::<SoulConfig>();

        app.init_resource::<SoulConfig>();
        if !app.world().contains_resource::<WeaponDefinitions>() {
            app.insert_resource(WeaponDefinitions::with_templates());
        }

        app.add_event::<ActivateWeaponIntent>()
            .add_event::<StartChannelIntent>()
            .add_event::<SessionEntered>()
            .add_event::<SoulConsumed>()
            .add_event::<WeaponExhausted>()
            .add_event::<WeaponRecovered>()
            .add_event::<ActivationRefused>()
            .add_event::<ChannelConsumed>()
            .add_event::<ChannelFinished>()
            .add_event::<WeaponEffect>();

        app.configure_sets(
            FixedUpdate,
            (
                SoulSet::Modifiers,
                SoulSet::Session,
                SoulSet::Consumption,
                SoulSet::Regeneration,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                recompute_equipment_multipliers.in_set(SoulSet::Modifiers),
                refill_on_session_enter.in_set(SoulSet::Session),
                (
                    process_activation_intents,
                    process_channel_start_intents,
                    tick_soul_channels,
                )
                    .chain()
                    .in_set(SoulSet::Consumption),
                regenerate_soul_weapons.in_set(SoulSet::Regeneration),
            ),
        );
    }
}

// ============================================================================
// World helpers (spawn / remove soul-оружия)
// ============================================================================

/// Создать instance оружия в inventory carrier'а
///
/// Instance создаётся полным (с учётом текущего equipment и quality).
/// None если carrier не `SoulCarrier` или kind неизвестен.
pub fn spawn_soul_weapon(
    world: &mut World,
    carrier: Entity,
    kind: &WeaponKind,
    quality: Option<QualityModifier>,
) -> Option<Entity> {
    let equipment = match world.get::<EquipmentMultiplier>(carrier) {
        Some(equipment) => *equipment,
        None => {
            crate::logger::log_error(&format!(
                "spawn_soul_weapon: {:?} is not a soul carrier",
                carrier
            ));
            return None;
        }
    };

    let Some(definition) = world.resource::<WeaponDefinitions>().get(kind).cloned() else {
        crate::logger::log_error(&format!("spawn_soul_weapon: unknown kind {}", kind));
        return None;
    };

    let cooldown = world.resource::<SoulConfig>().recovery_cooldown_ticks;

    let mut weapon = SoulWeapon::from_definition(&definition, equipment)
        .with_recovery_cooldown(cooldown);
    if let Some(quality) = quality {
        quality.apply(&mut weapon);
        weapon.refill(equipment);
    }

    let entity = world.spawn((weapon, Name::new(definition.name.clone()))).id();

    let Some(mut inventory) = world.get_mut::<SoulInventory>(carrier) else {
        world.despawn(entity);
        return None;
    };
    inventory.add(entity);

    crate::logger::log(&format!(
        "Spawned {} ({:?}) for carrier {:?}",
        kind, entity, carrier
    ));

    Some(entity)
}

/// Убрать оружие из inventory carrier'а и despawn'нуть его
///
/// false если оружия в inventory не было.
pub fn remove_soul_weapon(world: &mut World, carrier: Entity, weapon: Entity) -> bool {
    let removed = world
        .get_mut::<SoulInventory>(carrier)
        .map(|mut inventory| inventory.remove(weapon))
        .unwrap_or(false);

    if removed {
        world.despawn(weapon);
        crate::logger::log(&format!(
            "Removed {:?} from carrier {:?}",
            weapon, carrier
        ));
    }

    removed
}
