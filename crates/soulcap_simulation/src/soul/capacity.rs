//! Capacity math (чистые функции)
//!
//! Max capacity не хранится: equipment multiplier меняется каждый тик,
//! поэтому пересчитываем на каждый read.

/// floor(base × quality × equipment), минимум 1
///
/// Считаем в f32 (base × quality, затем × equipment): так 60 × 1.15 даёт
/// ровно 69, а не 68.999…
/// Минимум 1 — guard для деления в regen ramp.
pub fn max_capacity(base_capacity: u32, quality_multiplier: f32, equipment_multiplier: f32) -> u32 {
    let raw = base_capacity as f32 * quality_multiplier * equipment_multiplier;
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    raw as u32
}

/// Нижняя граница ramp'а для текущей capacity: floor(current / max × duration)
///
/// Integer-арифметика, без float drift'а.
pub fn ramp_floor(current: u32, max_capacity: u32, regen_duration: u32) -> u32 {
    let max_capacity = max_capacity.max(1) as u64;
    let scaled = current as u64 * regen_duration as u64 / max_capacity;
    scaled.min(u32::MAX as u64) as u32
}

/// Capacity которую даёт ramp: floor(progress / duration × max)
pub fn ramp_capacity(regen_progress: u32, regen_duration: u32, max_capacity: u32) -> u32 {
    let duration = regen_duration.max(1) as u64;
    let scaled = regen_progress as u64 * max_capacity as u64 / duration;
    scaled.min(max_capacity as u64) as u32
}
