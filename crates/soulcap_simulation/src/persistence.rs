//! Save/load soul-оружия
//!
//! Persisted только quality multiplier. Current/cooldown/exhausted/regen
//! живут в сессии: на load instance создаётся полным.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::components::{EquipmentMultiplier, SoulInventory, SoulWeapon};
use crate::item_system::{WeaponDefinitions, WeaponKind};
use crate::soul::spawn_soul_weapon;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quality multiplier must be finite and positive, got {0}")]
    InvalidMultiplier(f32),
    #[error("unknown weapon kind in save: {0}")]
    UnknownKind(WeaponKind),
}

fn default_quality_multiplier() -> f32 {
    1.0
}

fn validate_multiplier(value: f32) -> Result<f32, PersistenceError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PersistenceError::InvalidMultiplier(value))
    }
}

// ============================================================================
// Per-instance save
// ============================================================================

/// Persisted state одного instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoulWeaponSave {
    /// Отсутствует в старых save'ах → 1.0
    #[serde(default = "default_quality_multiplier")]
    pub quality_multiplier: f32,
}

impl Default for SoulWeaponSave {
    fn default() -> Self {
        Self {
            quality_multiplier: default_quality_multiplier(),
        }
    }
}

impl SoulWeaponSave {
    pub fn capture(weapon: &SoulWeapon) -> Self {
        Self {
            quality_multiplier: weapon.quality_multiplier(),
        }
    }

    /// Применить к instance и сделать его полным
    pub fn restore(
        &self,
        weapon: &mut SoulWeapon,
        equipment: EquipmentMultiplier,
    ) -> Result<(), PersistenceError> {
        let value = validate_multiplier(self.quality_multiplier)?;
        weapon.apply_quality_multiplier(value);
        weapon.refill(equipment);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Carrier save (весь inventory)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSoulWeapon {
    pub kind: WeaponKind,
    #[serde(flatten)]
    pub state: SoulWeaponSave,
}

/// Soul-оружие carrier'а в порядке inventory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarrierSave {
    pub weapons: Vec<SavedSoulWeapon>,
}

impl CarrierSave {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Snapshot inventory carrier'а (None если это не carrier)
pub fn capture_carrier(world: &World, carrier: Entity) -> Option<CarrierSave> {
    let inventory = world.get::<SoulInventory>(carrier)?;

    let weapons = inventory
        .iter()
        .filter_map(|item| world.get::<SoulWeapon>(item))
        .map(|weapon| SavedSoulWeapon {
            kind: weapon.kind.clone(),
            state: SoulWeaponSave::capture(weapon),
        })
        .collect();

    Some(CarrierSave { weapons })
}

/// Восстановить inventory carrier'а из save
///
/// Весь save валидируется до spawn'а: при ошибке мир не трогаем.
pub fn restore_carrier(
    world: &mut World,
    carrier: Entity,
    save: &CarrierSave,
) -> Result<Vec<Entity>, PersistenceError> {
    {
        let definitions = world.resource::<WeaponDefinitions>();
        for saved in &save.weapons {
            if definitions.get(&saved.kind).is_none() {
                return Err(PersistenceError::UnknownKind(saved.kind.clone()));
            }
            validate_multiplier(saved.state.quality_multiplier)?;
        }
    }

    let equipment = world
        .get::<EquipmentMultiplier>(carrier)
        .copied()
        .unwrap_or_default();

    let mut spawned = Vec::with_capacity(save.weapons.len());
    for saved in &save.weapons {
        let Some(entity) = spawn_soul_weapon(world, carrier, &saved.kind, None) else {
            continue;
        };
        if let Some(mut weapon) = world.get_mut::<SoulWeapon>(entity) {
            saved.state.restore(&mut weapon, equipment)?;
        }
        spawned.push(entity);
    }

    crate::logger::log_info(&format!(
        "Restored {} soul weapons for carrier {:?}",
        spawned.len(),
        carrier
    ));

    Ok(spawned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::SoulCarrier;
    use crate::item_system::QualityModifier;
    use crate::soul::SoulPlugin;

    #[test]
    fn test_only_quality_survives_save() {
        let mut weapon = SoulWeapon::new("cane", 60, 300);
        QualityModifier::Devoted.apply(&mut weapon);
        weapon.refill(EquipmentMultiplier::default());
        for _ in 0..20 {
            crate::components::Consumable::consume(&mut weapon);
        }

        let json = SoulWeaponSave::capture(&weapon).to_json().unwrap();
        let loaded = SoulWeaponSave::from_json(&json).unwrap();

        let mut fresh = SoulWeapon::new("cane", 60, 300);
        loaded.restore(&mut fresh, EquipmentMultiplier::default()).unwrap();

        assert_eq!(fresh.quality_multiplier(), 1.15);
        assert_eq!(fresh.current(), 69);
        assert!(!fresh.is_cooling());
    }

    #[test]
    fn test_missing_field_defaults_to_one() {
        let loaded = SoulWeaponSave::from_json("{}").unwrap();
        assert_eq!(loaded.quality_multiplier, 1.0);
    }

    #[test]
    fn test_rejects_bad_multiplier() {
        let save = SoulWeaponSave {
            quality_multiplier: -1.0,
        };
        let mut weapon = SoulWeapon::new("cane", 60, 300);
        assert!(matches!(
            save.restore(&mut weapon, EquipmentMultiplier::default()),
            Err(PersistenceError::InvalidMultiplier(_))
        ));
        assert_eq!(weapon.quality_multiplier(), 1.0);
    }

    #[test]
    fn test_rejects_broken_json() {
        assert!(matches!(
            SoulWeaponSave::from_json("{ quality"),
            Err(PersistenceError::Json(_))
        ));
    }

    #[test]
    fn test_carrier_save_round_trip() {
        let mut app = App::new();
        app.add_plugins(SoulPlugin);
        let world = app.world_mut();

        let carrier = world.spawn(SoulCarrier).id();
        spawn_soul_weapon(world, carrier, &"glyph".into(), Some(QualityModifier::Obsessive));
        spawn_soul_weapon(world, carrier, &"cane".into(), None);

        let save = capture_carrier(world, carrier).unwrap();
        let json = save.to_json().unwrap();

        let other = world.spawn(SoulCarrier).id();
        let restored = restore_carrier(world, other, &CarrierSave::from_json(&json).unwrap()).unwrap();

        assert_eq!(restored.len(), 2);
        let glyph = world.get::<SoulWeapon>(restored[0]).unwrap();
        assert_eq!(glyph.kind, WeaponKind::from("glyph"));
        assert_eq!(glyph.quality_multiplier(), 0.9);
        assert_eq!(glyph.current(), 9);
        assert_eq!(world.get::<SoulInventory>(other).unwrap().len(), 2);
    }

    #[test]
    fn test_restore_rejects_unknown_kind_without_spawning() {
        let mut app = App::new();
        app.add_plugins(SoulPlugin);
        let world = app.world_mut();
        let carrier = world.spawn(SoulCarrier).id();

        let save = CarrierSave {
            weapons: vec![
                SavedSoulWeapon {
                    kind: "glyph".into(),
                    state: SoulWeaponSave::default(),
                },
                SavedSoulWeapon {
                    kind: "bone_whistle".into(),
                    state: SoulWeaponSave::default(),
                },
            ],
        };

        assert!(matches!(
            restore_carrier(world, carrier, &save),
            Err(PersistenceError::UnknownKind(_))
        ));
        assert!(world.get::<SoulInventory>(carrier).unwrap().is_empty());
    }
}
