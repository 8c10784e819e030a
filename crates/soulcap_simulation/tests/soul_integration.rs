//! Soul engine integration test
//!
//! Полный headless App (SimulationPlugin), тики гоняются через FixedUpdate.
//!
//! Проверяем:
//! - Scenarios A–E через публичный API
//! - Propagation + regen + gear в одном прогоне
//! - Инварианты capacity на каждом тике

use bevy::prelude::*;
use soulcap_simulation::*;

fn create_soul_app() -> App {
    create_headless_app(42)
}

fn spawn_carrier(app: &mut App) -> Entity {
    app.world_mut().spawn(SoulCarrier).id()
}

fn give(app: &mut App, carrier: Entity, kind: &str, quality: Option<QualityModifier>) -> Entity {
    spawn_soul_weapon(app.world_mut(), carrier, &WeaponKind::from(kind), quality)
        .expect("weapon spawned")
}

fn soul(app: &App, weapon: Entity) -> SoulWeapon {
    app.world().get::<SoulWeapon>(weapon).unwrap().clone()
}

fn equipment(app: &App, carrier: Entity) -> EquipmentMultiplier {
    *app.world().get::<EquipmentMultiplier>(carrier).unwrap()
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn register_cane_60(app: &mut App) {
    // Чистый setup Scenario A/B: base 60, regen 300
    let mut definitions = WeaponDefinitions::new();
    definitions
        .add(WeaponDefinition {
            kind: "test_blade".into(),
            name: "Test Blade".into(),
            class: WeaponClass::Cane,
            base_capacity: 60,
            regen_duration_ticks: 300,
            use_time: 20,
            activation: ActivationMode::Discrete,
            channel_effect: ChannelEffect::None,
        })
        .unwrap();
    app.insert_resource(definitions);
}

/// Scenario A + B через intents: 60 активаций → exhausted → 300 + 300 тиков → полный
#[test]
fn test_drain_and_full_cycle() {
    let mut app = create_soul_app();
    register_cane_60(&mut app);
    let carrier = spawn_carrier(&mut app);
    let blade = give(&mut app, carrier, "test_blade", None);

    app.world_mut().send_event(ActivateWeaponIntent { carrier, weapon: blade });
    run_fixed_tick(&mut app);
    assert_eq!(soul(&app, blade).current(), 59);
    assert!(!soul(&app, blade).exhausted);

    for _ in 0..59 {
        app.world_mut().send_event(ActivateWeaponIntent { carrier, weapon: blade });
        run_fixed_tick(&mut app);
        // Cooldown перезапускается каждым consume → regen не стартует
        assert!(soul(&app, blade).is_cooling());
    }
    assert_eq!(soul(&app, blade).current(), 0);
    assert!(soul(&app, blade).exhausted);

    // Тик последнего consume уже отъел один тик cooldown'а
    for _ in 0..299 {
        run_fixed_tick(&mut app);
    }
    assert_eq!(soul(&app, blade).current(), 0);
    assert!(!soul(&app, blade).is_cooling());

    for _ in 0..300 {
        run_fixed_tick(&mut app);
    }
    let blade_state = soul(&app, blade);
    assert_eq!(blade_state.current(), 60);
    assert!(!blade_state.exhausted);
    assert_eq!(drain::<WeaponRecovered>(&mut app).len(), 1);
}

/// Scenario C: две копии glyph (10) → consume одной → обе 9
#[test]
fn test_siblings_share_reserve() {
    let mut app = create_soul_app();
    let carrier = spawn_carrier(&mut app);
    let first = give(&mut app, carrier, "glyph", None);
    let second = give(&mut app, carrier, "glyph", None);

    app.world_mut().send_event(ActivateWeaponIntent { carrier, weapon: first });
    run_fixed_tick(&mut app);

    assert_eq!(soul(&app, first).current(), 9);
    assert_eq!(soul(&app, second).current(), 9);

    // Drain через вторую копию: первая тоже пустеет (exhausted сама по себе)
    for _ in 0..9 {
        app.world_mut().send_event(ActivateWeaponIntent { carrier, weapon: second });
    }
    run_fixed_tick(&mut app);

    assert!(soul(&app, first).exhausted);
    assert!(soul(&app, second).exhausted);

    app.world_mut().send_event(ActivateWeaponIntent { carrier, weapon: first });
    run_fixed_tick(&mut app);
    let refused = drain::<ActivationRefused>(&mut app);
    assert_eq!(refused.len(), 1);
    assert_eq!(refused[0].reason, RefusalReason::Exhausted);
}

/// Scenario D: Devoted (×1.15) на base 60 → max 69
#[test]
fn test_quality_prefix_raises_max() {
    let mut app = create_soul_app();
    register_cane_60(&mut app);
    let carrier = spawn_carrier(&mut app);
    let blade = give(&mut app, carrier, "test_blade", Some(QualityModifier::Devoted));

    let equip = equipment(&app, carrier);
    assert_eq!(soul(&app, blade).max_capacity(equip), 69);
    assert_eq!(soul(&app, blade).current(), 69);
    assert_eq!(soul(&app, blade).readout(equip).quality_bonus_percent, 15);
}

/// Scenario E через ECS: interval 10 / speed 2 → consume на 5, 10, 15, 20
#[test]
fn test_channel_through_ecs() {
    let mut app = create_soul_app();
    let carrier = app
        .world_mut()
        .spawn((SoulCarrier, AttackSpeed(2.0), ChannelInput { held: true }))
        .id();
    let cane = give(&mut app, carrier, "cane", None);

    app.world_mut().send_event(StartChannelIntent {
        carrier,
        weapon: cane,
        base_interval: Some(10),
    });

    let mut totals = Vec::new();
    for _ in 0..21 {
        run_fixed_tick(&mut app);
        totals.extend(drain::<ChannelConsumed>(&mut app).into_iter().map(|e| e.total_consumed));
    }

    assert_eq!(totals, vec![1, 2, 3, 4]);
    assert_eq!(soul(&app, cane).current(), 56);

    app.world_mut().entity_mut(carrier).insert(ChannelInput { held: false });
    run_fixed_tick(&mut app);

    let finished = drain::<ChannelFinished>(&mut app);
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].total_consumed, 4);
    assert!(app.world().get::<SoulChannel>(carrier).is_none());
}

/// Gear надели → max вырос, regen дотягивает; сняли → current зажат в новый max
#[test]
fn test_gear_changes_follow_through() {
    let mut app = create_soul_app();
    let carrier = spawn_carrier(&mut app);
    let focus = give(&mut app, carrier, "focus", None);

    app.world_mut()
        .get_mut::<EquippedSoulGear>(carrier)
        .unwrap()
        .equip(SoulGearPiece::new("soul lantern", CapacityModifier::Multiplicative(2.0)));

    for _ in 0..300 {
        run_fixed_tick(&mut app);
    }
    assert_eq!(soul(&app, focus).current(), 60);

    app.world_mut()
        .get_mut::<EquippedSoulGear>(carrier)
        .unwrap()
        .unequip("soul lantern");
    run_fixed_tick(&mut app);

    assert_eq!(equipment(&app, carrier), EquipmentMultiplier(1.0));
    assert_eq!(soul(&app, focus).current(), 30);
}

/// Session entry после save/load: только quality переживает, остальное полное
#[test]
fn test_save_load_then_session_entry() {
    let mut app = create_soul_app();
    let carrier = spawn_carrier(&mut app);
    let glyph = give(&mut app, carrier, "glyph", Some(QualityModifier::Transcendent));

    for _ in 0..4 {
        app.world_mut().send_event(ActivateWeaponIntent { carrier, weapon: glyph });
    }
    run_fixed_tick(&mut app);
    assert_eq!(soul(&app, glyph).current(), 7);

    let json = persistence::capture_carrier(app.world(), carrier)
        .unwrap()
        .to_json()
        .unwrap();

    let loaded = spawn_carrier(&mut app);
    let restored = persistence::restore_carrier(
        app.world_mut(),
        loaded,
        &CarrierSave::from_json(&json).unwrap(),
    )
    .unwrap();

    app.world_mut().send_event(SessionEntered { carrier: loaded });
    run_fixed_tick(&mut app);

    let restored_glyph = soul(&app, restored[0]);
    assert_eq!(restored_glyph.quality_multiplier(), 1.1);
    assert_eq!(restored_glyph.current(), 11);
    assert!(!restored_glyph.is_cooling());
}

/// Случайная нагрузка: current ≤ max на каждом тике
#[test]
fn test_invariants_hold_every_tick() {
    let (_, stats) = soak::run_soak(42, 3000);

    assert_eq!(stats.invariant_violations, 0);
    assert!(stats.consumed > 0);
    assert!(stats.exhausted > 0, "soak should drain something: {:?}", stats);
    assert!(stats.recovered > 0, "soak should recover something: {:?}", stats);
}

#[test]
fn test_remove_weapon() {
    let mut app = create_soul_app();
    let carrier = spawn_carrier(&mut app);
    let glyph = give(&mut app, carrier, "glyph", None);

    assert!(remove_soul_weapon(app.world_mut(), carrier, glyph));
    assert!(!app.world().entities().contains(glyph));
    assert!(app.world().get::<SoulInventory>(carrier).unwrap().is_empty());
    assert!(!remove_soul_weapon(app.world_mut(), carrier, glyph));
}
