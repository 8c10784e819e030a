//! Soul gear — armor/accessories которые двигают soul capacity
//!
//! Каждый piece — независимый contributor equipment multiplier'а.
//! Gear не хранит accumulated state: fold делает система каждый тик.

use bevy::prelude::*;
use crate::soul::modifiers::CapacityModifier;

/// Один надетый предмет (броня, аксессуар)
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct SoulGearPiece {
    pub name: String,
    pub modifier: CapacityModifier,
}

impl SoulGearPiece {
    pub fn new(name: impl Into<String>, modifier: CapacityModifier) -> Self {
        Self {
            name: name.into(),
            modifier,
        }
    }
}

/// Надетый gear carrier'а (порядок = порядок fold'а)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct EquippedSoulGear {
    pub pieces: Vec<SoulGearPiece>,
}

impl EquippedSoulGear {
    pub fn equip(&mut self, piece: SoulGearPiece) {
        self.pieces.push(piece);
    }

    /// Снять по имени; true если что-то сняли
    pub fn unequip(&mut self, name: &str) -> bool {
        let before = self.pieces.len();
        self.pieces.retain(|p| p.name != name);
        self.pieces.len() != before
    }

    pub fn modifiers(&self) -> impl Iterator<Item = CapacityModifier> + '_ {
        self.pieces.iter().map(|p| p.modifier)
    }
}
