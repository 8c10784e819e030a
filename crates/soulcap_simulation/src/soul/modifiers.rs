//! Capacity Modifier Registry
//!
//! Два независимых множителя max capacity:
//! - equipment multiplier — per-carrier, пересобирается каждый тик (reset → fold)
//! - quality multiplier — per-instance, фиксируется при назначении prefix'а

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use crate::components::SoulWeapon;
use crate::item_system::QualityModifier;

/// Один contribution в equipment multiplier
#[derive(Clone, Copy, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub enum CapacityModifier {
    /// Добавляется к running multiplier (+0.1 = +10% base capacity)
    Additive(f32),
    /// Умножает running multiplier
    Multiplicative(f32),
}

impl CapacityModifier {
    fn fold_into(self, acc: f32) -> f32 {
        match self {
            CapacityModifier::Additive(bonus) => acc + bonus,
            CapacityModifier::Multiplicative(factor) => acc * factor,
        }
    }
}

/// Reset-then-fold: стартуем с 1.0, применяем contributions по порядку
pub fn fold_equipment_multiplier<I>(contributions: I) -> f32
where
    I: IntoIterator<Item = CapacityModifier>,
{
    contributions
        .into_iter()
        .fold(1.0, |acc, modifier| modifier.fold_into(acc))
}

impl QualityModifier {
    /// Применить prefix к instance (перезапись, не компаунд)
    pub fn apply(self, weapon: &mut SoulWeapon) {
        weapon.apply_quality_multiplier(self.soul_capacity_multiplier());
    }
}
