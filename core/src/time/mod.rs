pub mod base;
pub mod clock;
pub mod notation;
pub mod signature;
pub mod tempo;
pub mod ticks;

pub use self::base::{FixedTempo, TimeBase};
pub use self::clock::{ClockTime, Seconds};
pub use self::notation::{Notation, NotationError};
pub use self::signature::Signature;
pub use self::tempo::Tempo;
pub use self::ticks::TicksTime;
