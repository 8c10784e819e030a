//! Randomized soak run (headless)
//!
//! Один carrier с двумя копиями glyph, cane и focus; случайные активации,
//! channel'ы, stun'ы и смена gear. Всё решает `DeterministicRng`, так что
//! прогон с тем же seed повторяется тик-в-тик.

use bevy::prelude::*;
use rand::Rng;
use crate::components::{
    ChannelInput, CrowdControlled, EquipmentMultiplier, EquippedSoulGear, SoulCarrier,
    SoulGearPiece, SoulInventory, SoulWeapon,
};
use crate::item_system::{QualityModifier, WeaponDefinitions, WeaponKind};
use crate::soul::*;
use crate::{create_headless_app, run_fixed_tick, DeterministicRng};

const LOADOUT: [(&str, Option<QualityModifier>); 4] = [
    ("glyph", Some(QualityModifier::Devoted)),
    ("glyph", None),
    ("cane", Some(QualityModifier::Uncanny)),
    ("focus", Some(QualityModifier::Obsessive)),
];

/// Prefix, выданный оружию при сборке loadout'а
#[derive(Component, Debug, Clone, Copy)]
struct LoadoutQuality(QualityModifier);

fn loadout_quality(world: &World, weapon: Entity) -> Option<QualityModifier> {
    world.get::<LoadoutQuality>(weapon).map(|q| q.0)
}

/// Счётчики soak прогона
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoakStats {
    pub ticks: u32,
    pub consumed: u32,
    pub refused: u32,
    pub exhausted: u32,
    pub recovered: u32,
    pub channels_finished: u32,
    pub channel_consumed: u32,
    /// Тики на которых нарушен current ≤ max (должно быть 0)
    pub invariant_violations: u32,
}

fn drain_count<E: Event>(world: &mut World) -> u32 {
    world.resource_mut::<Events<E>>().drain().count() as u32
}

/// Проверка current ≤ max для всего inventory carrier'а
fn capacity_within_bounds(world: &World, carrier: Entity) -> bool {
    let Some(inventory) = world.get::<SoulInventory>(carrier) else {
        return true;
    };
    let equipment = world
        .get::<EquipmentMultiplier>(carrier)
        .copied()
        .unwrap_or_default();

    inventory
        .iter()
        .filter_map(|item| world.get::<SoulWeapon>(item))
        .all(|weapon| weapon.current() <= weapon.max_capacity(equipment))
}

/// Собрать carrier'а с набором оружия; возвращает (carrier, weapons)
pub fn spawn_soak_carrier(world: &mut World) -> (Entity, Vec<Entity>) {
    let carrier = world.spawn((SoulCarrier, Name::new("Soak Carrier"))).id();

    let weapons = LOADOUT
        .into_iter()
        .filter_map(|(kind, quality)| {
            let entity = spawn_soul_weapon(world, carrier, &WeaponKind::from(kind), quality)?;
            if let Some(quality) = quality {
                world.entity_mut(entity).insert(LoadoutQuality(quality));
            }
            Some(entity)
        })
        .collect();

    (carrier, weapons)
}

/// Прогнать `ticks` тиков; возвращает app (для snapshot'а) и статистику
pub fn run_soak(seed: u64, ticks: u32) -> (App, SoakStats) {
    let mut app = create_headless_app(seed);
    let (carrier, weapons) = spawn_soak_carrier(app.world_mut());
    let mut stats = SoakStats::default();

    app.world_mut().send_event(SessionEntered { carrier });

    for _ in 0..ticks {
        drive_carrier(app.world_mut(), carrier, &weapons);
        run_fixed_tick(&mut app);

        let world = app.world_mut();
        stats.ticks += 1;
        stats.consumed += drain_count::<SoulConsumed>(world);
        stats.refused += drain_count::<ActivationRefused>(world);
        stats.exhausted += drain_count::<WeaponExhausted>(world);
        stats.recovered += drain_count::<WeaponRecovered>(world);
        stats.channels_finished += drain_count::<ChannelFinished>(world);
        stats.channel_consumed += drain_count::<ChannelConsumed>(world);
        drain_count::<WeaponEffect>(world);

        if !capacity_within_bounds(world, carrier) {
            stats.invariant_violations += 1;
        }
    }

    (app, stats)
}

/// Случайные intents на один тик
fn drive_carrier(world: &mut World, carrier: Entity, weapons: &[Entity]) {
    let channeling = world.get::<SoulChannel>(carrier).is_some();

    let (activate, start, release, stun, swap_gear, pick) = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        let rng = &mut rng.rng;
        (
            rng.gen_bool(0.3),
            !channeling && rng.gen_bool(0.05),
            channeling && rng.gen_bool(0.08),
            rng.gen_bool(0.02),
            rng.gen_bool(0.01),
            rng.gen_range(0..weapons.len().max(1)),
        )
    };

    let Some(&weapon) = weapons.get(pick) else {
        return;
    };

    if activate {
        world.send_event(ActivateWeaponIntent { carrier, weapon });
    }

    if start {
        // Prefix двигает use time → host передаёт его как override interval'а
        let base_interval = loadout_quality(world, weapon).and_then(|quality| {
            let kind = world.get::<SoulWeapon>(weapon)?.kind.clone();
            let use_time = world.resource::<WeaponDefinitions>().get(&kind)?.use_time;
            Some(quality.scale_use_time(use_time))
        });

        world
            .entity_mut(carrier)
            .insert(ChannelInput { held: true });
        world.send_event(StartChannelIntent {
            carrier,
            weapon,
            base_interval,
        });
    }

    if release {
        world
            .entity_mut(carrier)
            .insert(ChannelInput { held: false });
    }

    if stun {
        let mut entity = world.entity_mut(carrier);
        if entity.contains::<CrowdControlled>() {
            entity.remove::<CrowdControlled>();
        } else {
            entity.insert(CrowdControlled);
        }
    }

    if swap_gear {
        if let Some(mut gear) = world.get_mut::<EquippedSoulGear>(carrier) {
            if !gear.unequip("reliquary") {
                gear.equip(SoulGearPiece::new(
                    "reliquary",
                    CapacityModifier::Additive(0.25),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soak_keeps_capacity_in_bounds() {
        let (_, stats) = run_soak(7, 2000);
        assert_eq!(stats.ticks, 2000);
        assert_eq!(stats.invariant_violations, 0);
        assert!(stats.consumed > 0);
    }
}
