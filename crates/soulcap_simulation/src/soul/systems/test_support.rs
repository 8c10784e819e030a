//! Общие helpers для ECS тестов soul систем.

use bevy::prelude::*;
use crate::components::{SoulCarrier, SoulWeapon};
use crate::item_system::WeaponKind;
use crate::soul::{spawn_soul_weapon, SoulPlugin};

pub fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(SoulPlugin);
    app
}

/// Один fixed tick (без Time accumulator'а)
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

pub fn tick_n(app: &mut App, n: usize) {
    for _ in 0..n {
        tick(app);
    }
}

pub fn spawn_carrier(app: &mut App) -> Entity {
    app.world_mut().spawn(SoulCarrier).id()
}

pub fn give(app: &mut App, carrier: Entity, kind: &str) -> Entity {
    spawn_soul_weapon(app.world_mut(), carrier, &WeaponKind::from(kind), None)
        .expect("carrier + known kind")
}

pub fn weapon(app: &App, entity: Entity) -> SoulWeapon {
    app.world()
        .get::<SoulWeapon>(entity)
        .cloned()
        .expect("soul weapon exists")
}

pub fn send<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
}

/// Забрать все накопленные события типа E
pub fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}
