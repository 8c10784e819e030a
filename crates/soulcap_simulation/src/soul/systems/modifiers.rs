//! Equipment multiplier recompute (первая фаза тика).

use bevy::prelude::*;
use crate::components::{EquipmentMultiplier, EquippedSoulGear};
use crate::soul::modifiers::fold_equipment_multiplier;

/// System: пересобрать equipment multiplier каждого carrier'а
///
/// Reset-then-fold по надетому gear. Multiplier перезаписывается целиком,
/// поэтому между тиками ничего не накапливается.
pub fn recompute_equipment_multipliers(
    mut carriers: Query<(&EquippedSoulGear, &mut EquipmentMultiplier)>,
) {
    for (gear, mut multiplier) in carriers.iter_mut() {
        let folded = fold_equipment_multiplier(gear.modifiers());
        // set_if_neq: не дёргаем Changed<EquipmentMultiplier> каждый тик
        multiplier.set_if_neq(EquipmentMultiplier(folded));
    }
}
