//! Per-tick cooldown + regen (последняя фаза тика).

use bevy::prelude::*;
use crate::components::{
    EquipmentMultiplier, RegenOutcome, Regenerating, SoulInventory, SoulWeapon,
};
use crate::soul::events::WeaponRecovered;

/// System: regen tick для каждого оружия в каждом inventory
///
/// Идёт после consumption фазы: оружие, опустевшее на этом тике,
/// сразу начинает cooldown без попытки regen.
/// Оружие вне inventory не тикает.
pub fn regenerate_soul_weapons(
    carriers: Query<(Entity, &SoulInventory, &EquipmentMultiplier)>,
    mut weapons: Query<&mut SoulWeapon>,
    mut recovered_events: EventWriter<WeaponRecovered>,
) {
    for (carrier, inventory, equipment) in carriers.iter() {
        for item in inventory.iter() {
            let Ok(mut weapon) = weapons.get_mut(item) else {
                continue;
            };

            let max = weapon.max_capacity(*equipment);
            let was_exhausted = weapon.exhausted;

            if weapon.regen_tick(max) == RegenOutcome::Recovered {
                recovered_events.write(WeaponRecovered {
                    carrier,
                    weapon: item,
                });

                if was_exhausted {
                    crate::logger::log_info(&format!(
                        "{} ({:?}) recovered from exhaustion: {}/{}",
                        weapon.kind, item, weapon.current, max
                    ));
                }
            }
        }
    }
}
