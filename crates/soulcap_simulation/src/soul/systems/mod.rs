//! Soul engine systems (FixedUpdate)
//!
//! Порядок внутри тика задаётся `SoulSet` (см. `soul::mod`):
//! Modifiers → Session → Consumption → Regeneration.

pub mod activation;
pub mod channel;
pub mod modifiers;
pub mod regeneration;
pub mod session;

pub use activation::*;
pub use channel::*;
pub use modifiers::*;
pub use regeneration::*;
pub use session::*;

#[cfg(test)]
mod test_support;
