//! Item System — определения soul-оружия
//!
//! # Архитектура
//!
//! **WeaponDefinition** — статический blueprint (kind + capacity + timings):
//! - Хранится в `WeaponDefinitions` resource (HashMap lookup по `WeaponKind`)
//! - Immutable данные, валидируются при регистрации (не в runtime!)
//! - Создаются hardcoded в `WeaponDefinitions::with_templates()` или из JSON
//!
//! **SoulWeapon** (component) — runtime instance, создаётся из definition
//! через `SoulWeapon::from_definition`.
//!
//! **ActivationMode** — закрытый набор поведений поверх одной state machine:
//! - Discrete → один consume на активацию
//! - Channeled → consume по таймеру пока кнопка зажата (`SoulChannel`)
//!
//! # Пример
//!
//! ```ignore
//! let def = definitions.get(&WeaponKind::from("cane"))?;
//! let weapon = SoulWeapon::from_definition(def, EquipmentMultiplier::default());
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// WeaponKind
// ============================================================================

/// Identity key шаблона оружия
///
/// Все instances с одинаковым kind в одном inventory — siblings
/// (делят один soul reserve, см. `soul::propagation`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponKind(pub String);

impl From<&str> for WeaponKind {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// WeaponClass / ActivationMode / ChannelEffect
// ============================================================================

/// Класс soul-оружия (для UI и категорий)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum WeaponClass {
    Focus,
    Cane,
    Glyph,
}

/// Как оружие тратит capacity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ActivationMode {
    /// Один consume на каждую активацию
    Discrete,
    /// Consume раз в interval пока holder держит кнопку
    Channeled,
}

/// Когда channeled оружие триггерит эффект (projectile collaborator)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum ChannelEffect {
    #[default]
    None,
    /// Эффект на каждый consume
    PerConsumption,
    /// Один эффект в конце, сила = total consumed
    OnFinish,
    Both,
}

impl ChannelEffect {
    pub fn fires_per_consumption(self) -> bool {
        matches!(self, ChannelEffect::PerConsumption | ChannelEffect::Both)
    }

    pub fn fires_on_finish(self) -> bool {
        matches!(self, ChannelEffect::OnFinish | ChannelEffect::Both)
    }
}

// ============================================================================
// WeaponDefinition
// ============================================================================

/// Static weapon definition (blueprint)
#[derive(Clone, Debug, PartialEq, Reflect, Serialize, Deserialize)]
pub struct WeaponDefinition {
    /// Unique kind
    pub kind: WeaponKind,
    /// Локализованное название
    pub name: String,
    pub class: WeaponClass,

    /// Base soul capacity (до equipment/quality модификаторов), > 0
    pub base_capacity: u32,
    /// Тики на полный regen 0 → max (без учёта cooldown), > 0
    pub regen_duration_ticks: u32,
    /// Номинальный interval активации (тики); default base interval для channel
    pub use_time: u32,

    pub activation: ActivationMode,
    #[serde(default)]
    pub channel_effect: ChannelEffect,
}

impl WeaponDefinition {
    /// Проверка content-контракта (вызывается при регистрации)
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.base_capacity == 0 {
            return Err(DefinitionError::ZeroCapacity(self.kind.clone()));
        }
        if self.regen_duration_ticks == 0 {
            return Err(DefinitionError::ZeroRegenDuration(self.kind.clone()));
        }
        if self.use_time == 0 {
            return Err(DefinitionError::ZeroUseTime(self.kind.clone()));
        }
        Ok(())
    }

    pub fn is_channeled(&self) -> bool {
        self.activation == ActivationMode::Channeled
    }

    /// Focus preset — channel, залп в конце (по снаряду на каждый soul)
    pub fn template_focus() -> Self {
        Self {
            kind: "focus".into(),
            name: "Soul Focus".to_string(),
            class: WeaponClass::Focus,
            base_capacity: 30,
            regen_duration_ticks: 5 * 60,
            use_time: 10,
            activation: ActivationMode::Channeled,
            channel_effect: ChannelEffect::OnFinish,
        }
    }

    /// Cane preset — channel, выстрел на каждый consume
    pub fn template_cane() -> Self {
        Self {
            kind: "cane".into(),
            name: "Soul Cane".to_string(),
            class: WeaponClass::Cane,
            base_capacity: 60,
            regen_duration_ticks: 5 * 60,
            use_time: 8,
            activation: ActivationMode::Channeled,
            channel_effect: ChannelEffect::PerConsumption,
        }
    }

    /// Glyph preset — обычная discrete активация
    pub fn template_glyph() -> Self {
        Self {
            kind: "glyph".into(),
            name: "Soul Glyph".to_string(),
            class: WeaponClass::Glyph,
            base_capacity: 10,
            regen_duration_ticks: 5 * 60,
            use_time: 15,
            activation: ActivationMode::Discrete,
            channel_effect: ChannelEffect::None,
        }
    }
}

/// Content-definition errors (не runtime!)
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("weapon `{0}`: base_capacity must be positive")]
    ZeroCapacity(WeaponKind),
    #[error("weapon `{0}`: regen_duration_ticks must be positive")]
    ZeroRegenDuration(WeaponKind),
    #[error("weapon `{0}`: use_time must be positive")]
    ZeroUseTime(WeaponKind),
    #[error("weapon `{0}` is defined twice")]
    Duplicate(WeaponKind),
    #[error("malformed weapon definitions: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// QualityModifier (prefix)
// ============================================================================

/// Quality modifier (prefix) — фиксированный множитель soul capacity
///
/// Выбор prefix'а (roll chance, список) — внешний collaborator;
/// engine только применяет эффект.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum QualityModifier {
    Devoted,
    Transcendent,
    Esoteric,
    Uncanny,
    Dreadful,
    Obsessive,
}

impl QualityModifier {
    pub const ALL: [QualityModifier; 6] = [
        QualityModifier::Devoted,
        QualityModifier::Transcendent,
        QualityModifier::Esoteric,
        QualityModifier::Uncanny,
        QualityModifier::Dreadful,
        QualityModifier::Obsessive,
    ];

    pub fn soul_capacity_multiplier(self) -> f32 {
        match self {
            QualityModifier::Devoted => 1.15,
            QualityModifier::Transcendent => 1.1,
            QualityModifier::Esoteric | QualityModifier::Uncanny => 1.0,
            QualityModifier::Dreadful => 0.95,
            QualityModifier::Obsessive => 0.9,
        }
    }

    /// Множитель use time (< 1.0 = быстрее)
    pub fn use_time_multiplier(self) -> f32 {
        match self {
            QualityModifier::Transcendent => 0.9,
            QualityModifier::Uncanny => 0.85,
            QualityModifier::Obsessive => 1.1,
            _ => 1.0,
        }
    }

    /// Use time с учётом prefix'а (floor, минимум 1 тик)
    ///
    /// Host передаёт результат как `base_interval` в `StartChannelIntent`.
    pub fn scale_use_time(self, use_time: u32) -> u32 {
        ((use_time as f32 * self.use_time_multiplier()) as u32).max(1)
    }
}

// ============================================================================
// WeaponDefinitions (Resource)
// ============================================================================

/// Weapon definitions lookup table (resource)
#[derive(Resource, Clone, Debug, Default)]
pub struct WeaponDefinitions {
    definitions: HashMap<WeaponKind, WeaponDefinition>,
}

impl WeaponDefinitions {
    /// Пустой registry (без templates)
    pub fn new() -> Self {
        Self::default()
    }

    /// Hardcoded templates (Focus, Cane, Glyph)
    pub fn with_templates() -> Self {
        let mut defs = Self::new();
        for def in [
            WeaponDefinition::template_focus(),
            WeaponDefinition::template_cane(),
            WeaponDefinition::template_glyph(),
        ] {
            // Templates валидны по построению, дубликатов нет
            defs.definitions.insert(def.kind.clone(), def);
        }
        defs
    }

    /// Загрузить definitions из JSON массива (с валидацией каждого)
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let list: Vec<WeaponDefinition> = serde_json::from_str(json)?;
        let mut defs = Self::new();
        for def in list {
            defs.add(def)?;
        }
        Ok(defs)
    }

    pub fn get(&self, kind: &WeaponKind) -> Option<&WeaponDefinition> {
        self.definitions.get(kind)
    }

    /// Добавить definition (валидация + проверка дубликата)
    pub fn add(&mut self, definition: WeaponDefinition) -> Result<(), DefinitionError> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.kind) {
            return Err(DefinitionError::Duplicate(definition.kind));
        }
        self.definitions.insert(definition.kind.clone(), definition);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_registered() {
        let defs = WeaponDefinitions::with_templates();
        assert_eq!(defs.len(), 3);

        let cane = defs.get(&"cane".into()).unwrap();
        assert_eq!(cane.base_capacity, 60);
        assert!(cane.is_channeled());
        assert!(cane.channel_effect.fires_per_consumption());

        let focus = defs.get(&"focus".into()).unwrap();
        assert!(focus.channel_effect.fires_on_finish());
        assert!(!focus.channel_effect.fires_per_consumption());

        let glyph = defs.get(&"glyph".into()).unwrap();
        assert!(!glyph.is_channeled());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut def = WeaponDefinition::template_glyph();
        def.base_capacity = 0;

        let mut defs = WeaponDefinitions::new();
        assert!(matches!(defs.add(def), Err(DefinitionError::ZeroCapacity(_))));
        assert!(defs.is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut defs = WeaponDefinitions::with_templates();
        let result = defs.add(WeaponDefinition::template_cane());
        assert!(matches!(result, Err(DefinitionError::Duplicate(_))));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {
                "kind": "ember_focus",
                "name": "Ember Focus",
                "class": "Focus",
                "base_capacity": 40,
                "regen_duration_ticks": 270,
                "use_time": 12,
                "activation": "Channeled",
                "channel_effect": "Both"
            },
            {
                "kind": "bone_glyph",
                "name": "Bone Glyph",
                "class": "Glyph",
                "base_capacity": 12,
                "regen_duration_ticks": 300,
                "use_time": 20,
                "activation": "Discrete"
            }
        ]"#;

        let defs = WeaponDefinitions::from_json(json).unwrap();
        assert_eq!(defs.len(), 2);

        let ember = defs.get(&"ember_focus".into()).unwrap();
        assert_eq!(ember.regen_duration_ticks, 270);
        assert_eq!(ember.channel_effect, ChannelEffect::Both);

        let glyph = defs.get(&"bone_glyph".into()).unwrap();
        assert_eq!(glyph.channel_effect, ChannelEffect::None);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        let json = r#"[{
            "kind": "broken", "name": "Broken", "class": "Cane",
            "base_capacity": 10, "regen_duration_ticks": 0, "use_time": 8,
            "activation": "Channeled"
        }]"#;
        assert!(matches!(
            WeaponDefinitions::from_json(json),
            Err(DefinitionError::ZeroRegenDuration(_))
        ));

        assert!(matches!(
            WeaponDefinitions::from_json("not json"),
            Err(DefinitionError::Parse(_))
        ));
    }

    #[test]
    fn test_quality_modifier_table() {
        assert_eq!(QualityModifier::Devoted.soul_capacity_multiplier(), 1.15);
        assert_eq!(QualityModifier::Obsessive.soul_capacity_multiplier(), 0.9);
        assert_eq!(QualityModifier::Esoteric.soul_capacity_multiplier(), 1.0);
        assert_eq!(QualityModifier::ALL.len(), 6);
    }

    #[test]
    fn test_prefix_scales_use_time() {
        assert_eq!(QualityModifier::Transcendent.scale_use_time(10), 9);
        assert_eq!(QualityModifier::Uncanny.scale_use_time(8), 6);
        assert_eq!(QualityModifier::Obsessive.scale_use_time(10), 11);
        assert_eq!(QualityModifier::Devoted.scale_use_time(15), 15);
        assert_eq!(QualityModifier::Uncanny.scale_use_time(1), 1);
    }
}
