//! Channel tick system (ECS обёртка над `SoulChannel`).

use bevy::prelude::*;
use crate::components::{AttackSpeed, ChannelInput, CrowdControlled, SoulInventory, SoulWeapon};
use crate::item_system::WeaponDefinitions;
use crate::soul::channel::{ChannelInputs, SoulChannel};
use crate::soul::events::*;
use crate::soul::propagation::{consume_with_propagation, ConsumeReport};

/// System: один тик каждого активного channel'а
///
/// Inputs (held / crowd control / attack speed / capacity) читаются у
/// carrier'а каждый тик. Finished channel снимается с carrier'а.
pub fn tick_soul_channels(
    mut commands: Commands,
    mut channels: Query<(
        Entity,
        &mut SoulChannel,
        &SoulInventory,
        &ChannelInput,
        &AttackSpeed,
        Has<CrowdControlled>,
    )>,
    mut weapons: Query<&mut SoulWeapon>,
    definitions: Res<WeaponDefinitions>,
    mut consumed_events: EventWriter<ChannelConsumed>,
    mut finished_events: EventWriter<ChannelFinished>,
    mut exhausted_events: EventWriter<WeaponExhausted>,
    mut effect_events: EventWriter<WeaponEffect>,
) {
    for (carrier, mut channel, inventory, input, speed, crowd_controlled) in channels.iter_mut() {
        let weapon = channel.weapon;

        // Оружие выкинули из inventory посреди channel'а → capacity 0 → finish
        let capacity = if inventory.contains(weapon) {
            weapons.get(weapon).map(|soul| soul.current).unwrap_or(0)
        } else {
            0
        };

        let effect = weapons
            .get(weapon)
            .ok()
            .and_then(|soul| definitions.get(&soul.kind))
            .map(|def| def.channel_effect)
            .unwrap_or_default();

        let inputs = ChannelInputs {
            held: input.held,
            can_act: !crowd_controlled,
            speed_multiplier: speed.0,
            capacity,
        };

        let mut reports: Vec<ConsumeReport> = Vec::new();
        let step = channel.tick(inputs, || {
            let report = consume_with_propagation(weapon, inventory, &mut weapons)?;
            if !report.applied {
                return None;
            }
            reports.push(report);
            Some(report.remaining)
        });

        let total_before = channel.total_consumed() - step.consumed;
        for (index, report) in reports.iter().enumerate() {
            consumed_events.write(ChannelConsumed {
                carrier,
                weapon,
                total_consumed: total_before + index as u32 + 1,
            });

            if effect.fires_per_consumption() {
                effect_events.write(WeaponEffect {
                    carrier,
                    weapon,
                    power: 1,
                });
            }

            if report.exhausted_now {
                exhausted_events.write(WeaponExhausted { carrier, weapon });
                crate::logger::log_info(&format!(
                    "Weapon {:?} exhausted while channeling (carrier {:?})",
                    weapon, carrier
                ));
            }
        }

        let Some(total) = step.finished else {
            continue;
        };

        finished_events.write(ChannelFinished {
            carrier,
            weapon,
            total_consumed: total,
        });

        if effect.fires_on_finish() && total > 0 {
            effect_events.write(WeaponEffect {
                carrier,
                weapon,
                power: total,
            });
        }

        commands.entity(carrier).remove::<SoulChannel>();

        crate::logger::log(&format!(
            "Channel finished: carrier {:?} weapon {:?} (total {})",
            carrier, weapon, total
        ));
    }
}
