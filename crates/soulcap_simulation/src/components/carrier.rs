//! Carrier — агент, который носит soul-оружие
//!
//! Карта ответственности:
//! - `SoulInventory` — упорядоченный список weapon entities (владение top-down)
//! - `EquippedSoulGear` — contributors equipment multiplier'а
//! - `EquipmentMultiplier` — пересобирается каждый тик из gear
//! - `AttackSpeed`, `ChannelInput`, `CrowdControlled` — входы channel adapter'а

use bevy::prelude::*;
use crate::components::gear::EquippedSoulGear;

/// Carrier marker
///
/// Автоматически добавляет всё что нужно soul engine через Required Components.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(EquipmentMultiplier, SoulInventory, EquippedSoulGear, AttackSpeed, ChannelInput)]
pub struct SoulCarrier;

/// Equipment-derived multiplier max capacity
///
/// Не накапливается между тиками: `recompute_equipment_multipliers`
/// перезаписывает его reset-then-fold'ом.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EquipmentMultiplier(pub f32);

impl Default for EquipmentMultiplier {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Инвентарь carrier'а (только soul-оружие)
///
/// Порядок стабилен в пределах тика: propagation идёт по нему.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct SoulInventory {
    pub items: Vec<Entity>,
}

impl SoulInventory {
    pub fn add(&mut self, item: Entity) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    /// Убрать предмет; true если он был в inventory
    pub fn remove(&mut self, item: Entity) -> bool {
        let before = self.items.len();
        self.items.retain(|e| *e != item);
        self.items.len() != before
    }

    pub fn contains(&self, item: Entity) -> bool {
        self.items.contains(&item)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Attack speed stat holder'а (1.0 = номинальная)
///
/// Channel делит base interval на него при каждом reset countdown'а.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackSpeed(pub f32);

impl Default for AttackSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Input state: держит ли holder кнопку channel'а
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ChannelInput {
    pub held: bool,
}

/// Marker: holder не может действовать (stun, frozen, etc.)
///
/// Пока висит — активации отклоняются, channel обрывается.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CrowdControlled;
