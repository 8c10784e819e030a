//! Session entry: full refill всего soul-оружия carrier'а.

use bevy::prelude::*;
use crate::components::{EquipmentMultiplier, SoulInventory, SoulWeapon};
use crate::soul::events::SessionEntered;

/// System: carrier вошёл в сессию → всё оружие полное, cooldown/exhaust сброшены
///
/// Runtime state не persisted (только quality multiplier), поэтому
/// refill на входе — штатная политика, не баг.
pub fn refill_on_session_enter(
    mut events: EventReader<SessionEntered>,
    carriers: Query<(&SoulInventory, &EquipmentMultiplier)>,
    mut weapons: Query<&mut SoulWeapon>,
) {
    for event in events.read() {
        let Ok((inventory, equipment)) = carriers.get(event.carrier) else {
            crate::logger::log_error(&format!(
                "SessionEntered: {:?} is not a soul carrier",
                event.carrier
            ));
            continue;
        };

        let mut refilled = 0;
        for item in inventory.iter() {
            if let Ok(mut weapon) = weapons.get_mut(item) {
                weapon.refill(*equipment);
                refilled += 1;
            }
        }

        crate::logger::log_info(&format!(
            "Carrier {:?} entered session: {} soul weapons refilled",
            event.carrier, refilled
        ));
    }
}
