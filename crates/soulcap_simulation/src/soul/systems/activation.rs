//! Discrete активация + старт channel'а (activation gate).

use bevy::prelude::*;
use crate::components::{
    AttackSpeed, Consumable, CrowdControlled, SoulInventory, SoulWeapon,
};
use crate::item_system::{ActivationMode, WeaponDefinitions};
use crate::soul::channel::SoulChannel;
use crate::soul::events::*;
use crate::soul::propagation::consume_with_propagation;

/// Общая проверка gate'а для обоих видов активации
fn check_gate(
    carrier: Entity,
    weapon: Entity,
    inventory: &SoulInventory,
    crowd_controlled: bool,
    weapons: &Query<&mut SoulWeapon>,
    definitions: &WeaponDefinitions,
    expected: ActivationMode,
) -> Result<(), RefusalReason> {
    if !inventory.contains(weapon) {
        return Err(RefusalReason::NotCarried);
    }

    let Ok(soul) = weapons.get(weapon) else {
        return Err(RefusalReason::NotCarried);
    };

    let Some(def) = definitions.get(&soul.kind) else {
        crate::logger::log_error(&format!(
            "No WeaponDefinition for {} (carrier {:?})",
            soul.kind, carrier
        ));
        return Err(RefusalReason::UnknownKind);
    };

    if def.activation != expected {
        return Err(RefusalReason::WrongMode);
    }

    if crowd_controlled {
        return Err(RefusalReason::CrowdControlled);
    }

    if !soul.can_activate() {
        return Err(RefusalReason::Exhausted);
    }

    Ok(())
}

/// System: discrete активации
///
/// Gate → consume на source → propagation на siblings → events.
pub fn process_activation_intents(
    mut intents: EventReader<ActivateWeaponIntent>,
    carriers: Query<(&SoulInventory, Has<CrowdControlled>)>,
    mut weapons: Query<&mut SoulWeapon>,
    definitions: Res<WeaponDefinitions>,
    mut consumed_events: EventWriter<SoulConsumed>,
    mut exhausted_events: EventWriter<WeaponExhausted>,
    mut refused_events: EventWriter<ActivationRefused>,
    mut effect_events: EventWriter<WeaponEffect>,
) {
    for intent in intents.read() {
        let Ok((inventory, crowd_controlled)) = carriers.get(intent.carrier) else {
            crate::logger::log_error(&format!(
                "ActivateWeaponIntent: {:?} is not a soul carrier",
                intent.carrier
            ));
            continue;
        };

        if let Err(reason) = check_gate(
            intent.carrier,
            intent.weapon,
            inventory,
            crowd_controlled,
            &weapons,
            &definitions,
            ActivationMode::Discrete,
        ) {
            crate::logger::log(&format!(
                "Activation refused: carrier {:?} weapon {:?} ({:?})",
                intent.carrier, intent.weapon, reason
            ));
            refused_events.write(ActivationRefused {
                carrier: intent.carrier,
                weapon: intent.weapon,
                reason,
            });
            continue;
        }

        let Some(report) = consume_with_propagation(intent.weapon, inventory, &mut weapons) else {
            continue;
        };

        consumed_events.write(SoulConsumed {
            carrier: intent.carrier,
            weapon: intent.weapon,
            remaining: report.remaining,
            siblings_drained: report.siblings_drained,
        });
        effect_events.write(WeaponEffect {
            carrier: intent.carrier,
            weapon: intent.weapon,
            power: 1,
        });

        if report.exhausted_now {
            exhausted_events.write(WeaponExhausted {
                carrier: intent.carrier,
                weapon: intent.weapon,
            });
            crate::logger::log_info(&format!(
                "Weapon {:?} exhausted (carrier {:?}, {} siblings drained)",
                intent.weapon, intent.carrier, report.siblings_drained
            ));
        }
    }
}

/// System: старт channel'а
///
/// Вешает `SoulChannel` на carrier'а; дальше его ведёт `tick_soul_channels`.
pub fn process_channel_start_intents(
    mut commands: Commands,
    mut intents: EventReader<StartChannelIntent>,
    carriers: Query<(&SoulInventory, &AttackSpeed, Has<CrowdControlled>, Has<SoulChannel>)>,
    weapons: Query<&mut SoulWeapon>,
    definitions: Res<WeaponDefinitions>,
    mut refused_events: EventWriter<ActivationRefused>,
) {
    // Commands применятся только после системы: свои старты помним сами
    let mut started: Vec<Entity> = Vec::new();

    for intent in intents.read() {
        let Ok((inventory, speed, crowd_controlled, channeling)) = carriers.get(intent.carrier)
        else {
            crate::logger::log_error(&format!(
                "StartChannelIntent: {:?} is not a soul carrier",
                intent.carrier
            ));
            continue;
        };

        let gate = if channeling || started.contains(&intent.carrier) {
            Err(RefusalReason::AlreadyChanneling)
        } else {
            check_gate(
                intent.carrier,
                intent.weapon,
                inventory,
                crowd_controlled,
                &weapons,
                &definitions,
                ActivationMode::Channeled,
            )
        };

        if let Err(reason) = gate {
            crate::logger::log(&format!(
                "Channel refused: carrier {:?} weapon {:?} ({:?})",
                intent.carrier, intent.weapon, reason
            ));
            refused_events.write(ActivationRefused {
                carrier: intent.carrier,
                weapon: intent.weapon,
                reason,
            });
            continue;
        }

        // check_gate уже проверил что definition есть
        let base_interval = intent.base_interval.unwrap_or_else(|| {
            weapons
                .get(intent.weapon)
                .ok()
                .and_then(|soul| definitions.get(&soul.kind))
                .map(|def| def.use_time)
                .unwrap_or(1)
        });

        let mut channel = SoulChannel::new(intent.weapon, base_interval);
        channel.start(speed.0);
        commands.entity(intent.carrier).insert(channel);
        started.push(intent.carrier);

        crate::logger::log(&format!(
            "Channel started: carrier {:?} weapon {:?} (base interval {})",
            intent.carrier, intent.weapon, base_interval
        ));
    }
}
