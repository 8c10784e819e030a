//! Headless симуляция Soulcap
//!
//! Randomized soak soul engine'а: проверка инвариантов + повторяемость по seed

use soulcap_simulation::soak::run_soak;
use soulcap_simulation::{log_info, soul_snapshot};

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    println!("Starting Soulcap headless soak (seed: {})", seed);

    // Запускаем 1000 тиков симуляции
    let (mut app, stats) = run_soak(seed, 1000);

    log_info(&format!("Soak stats: {:?}", stats));
    println!(
        "Ticks {}: {} consumed, {} channel consumes, {} refused, {} exhausted, {} recovered",
        stats.ticks,
        stats.consumed,
        stats.channel_consumed,
        stats.refused,
        stats.exhausted,
        stats.recovered
    );

    let snapshot = soul_snapshot(app.world_mut());
    println!("Final snapshot: {} bytes", snapshot.len());

    if stats.invariant_violations > 0 {
        eprintln!(
            "Capacity invariant violated on {} ticks",
            stats.invariant_violations
        );
        std::process::exit(1);
    }

    println!("Simulation complete!");
}
