//! Cross-Instance Propagation
//!
//! Несколько копий одного оружия в inventory = один общий soul reserve.
//! Consume из любой копии → тот же consume на каждом sibling'е
//! (тот же kind, другая entity). Fan-out ровно на один уровень.
//! Exhausted sibling тоже получает decrement + cooldown: gate проверяет
//! только source.

use bevy::prelude::*;
use crate::components::{Consumable, SoulInventory, SoulWeapon};
use crate::item_system::WeaponKind;

/// Итог consume на source instance + fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeReport {
    /// Source реально потерял soul (false = был exhausted)
    pub applied: bool,
    pub remaining: u32,
    /// Source стал exhausted этим consume
    pub exhausted_now: bool,
    /// Сколько siblings получили тот же consume (включая уже exhausted)
    pub siblings_drained: usize,
}

/// ECS fan-out по inventory carrier'а (source пропускается по entity)
pub fn propagate_consumption(
    source: Entity,
    kind: &WeaponKind,
    inventory: &SoulInventory,
    weapons: &mut Query<&mut SoulWeapon>,
) -> usize {
    let mut drained = 0;

    for item in inventory.iter() {
        if item == source {
            continue;
        }

        let Ok(mut sibling) = weapons.get_mut(item) else {
            // Не soul-оружие (или уже despawned) — не наш sibling
            continue;
        };

        if sibling.kind != *kind {
            continue;
        }

        sibling.drain_from_sibling();
        drained += 1;
    }

    drained
}

/// Consume на source + propagation на siblings
///
/// None если source не soul-оружие.
pub fn consume_with_propagation(
    source: Entity,
    inventory: &SoulInventory,
    weapons: &mut Query<&mut SoulWeapon>,
) -> Option<ConsumeReport> {
    let (applied, remaining, exhausted_now, kind) = {
        let mut weapon = weapons.get_mut(source).ok()?;
        let was_exhausted = weapon.exhausted;
        let applied = weapon.consume();
        (
            applied,
            weapon.current,
            !was_exhausted && weapon.exhausted,
            weapon.kind.clone(),
        )
    };

    // Propagation только за реальным consume
    let siblings_drained = if applied {
        propagate_consumption(source, &kind, inventory, weapons)
    } else {
        0
    };

    Some(ConsumeReport {
        applied,
        remaining,
        exhausted_now,
        siblings_drained,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SoulState;

    #[test]
    fn test_sibling_drain_ignores_exhaustion() {
        let mut glyph = SoulWeapon::new("glyph", 1, 300);
        assert!(glyph.consume());
        assert!(glyph.exhausted);
        glyph.cooldown_remaining = 98;

        glyph.drain_from_sibling();

        assert_eq!(glyph.current(), 0);
        assert_eq!(glyph.cooldown_remaining, 300);
        assert_eq!(glyph.state(), SoulState::Exhausted);
    }

    #[test]
    fn test_sibling_drain_to_zero_exhausts() {
        let mut glyph = SoulWeapon::new("glyph", 1, 300);
        glyph.drain_from_sibling();
        assert_eq!(glyph.current(), 0);
        assert!(glyph.exhausted);
    }
}
