//! ECS Components soul engine
//!
//! Организация по доменам:
//! - carrier: агент с inventory (SoulCarrier, SoulInventory, EquipmentMultiplier, AttackSpeed)
//! - gear: contributors equipment multiplier'а (EquippedSoulGear, SoulGearPiece)
//! - soul_weapon: per-instance state machine (SoulWeapon, Consumable, Regenerating)

pub mod carrier;
pub mod gear;
pub mod soul_weapon;


// Re-exports для удобного импорта
pub use carrier::*;
pub use gear::*;
pub use soul_weapon::*;
