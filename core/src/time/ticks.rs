use std::{
  convert::TryFrom,
  fmt,
  ops::{Add, AddAssign, Div, Mul, Sub},
};

use crate::time::{clock, ClockTime, Signature, Tempo};

pub const TICKS_RESOLUTION: u64 = 508_032_000; // 2^10 * 3^4 * 5^3 * 7^2

/// Ticks in a whole note
pub const TICKS_PER_WHOLE: u64 = TICKS_RESOLUTION * 16;

/// Musical time. One sixteenth note is `TICKS_RESOLUTION` ticks.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct TicksTime(u64);

impl TicksTime {
  pub fn new(ticks: u64) -> TicksTime {
    TicksTime(ticks)
  }

  pub fn zero() -> TicksTime {
    TicksTime(0)
  }

  pub fn is_zero(&self) -> bool {
    self.0 == 0
  }

  pub fn units(&self) -> u64 {
    self.0
  }

  /// Duration of a 1/`note_value` note (4 for a quarter note, 8 for an eighth, ...)
  pub fn from_note_value(note_value: u16) -> TicksTime {
    TicksTime(TICKS_PER_WHOLE / u64::from(note_value.max(1)))
  }

  pub fn per_minute(signature: Signature, tempo: Tempo) -> TicksTime {
    let ticks_per_beat = TICKS_PER_WHOLE / u64::from(signature.get_note_value());
    TicksTime::new(ticks_per_beat * u64::from(tempo))
  }

  pub fn to_clock(&self, signature: Signature, tempo: Tempo) -> ClockTime {
    let ticks_per_minute = TicksTime::per_minute(signature, tempo).0;
    let clock_units =
      u128::from(self.0) * u128::from(clock::UNITS_PER_MINUTE) / u128::from(ticks_per_minute);
    // saturate instead of wrapping, far indices land at the end of time
    ClockTime::new(u64::try_from(clock_units).unwrap_or(u64::MAX))
  }

  /// Split into `parts` equal slots, `None` when there is nothing to split into
  pub fn checked_div(self, parts: usize) -> Option<TicksTime> {
    if parts == 0 {
      None
    } else {
      Some(TicksTime(self.0 / parts as u64))
    }
  }
}

impl fmt::Display for TicksTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}i", self.0)
  }
}

impl Add for TicksTime {
  type Output = TicksTime;
  fn add(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0.saturating_add(rhs.0))
  }
}

impl AddAssign for TicksTime {
  fn add_assign(&mut self, rhs: TicksTime) {
    *self = *self + rhs;
  }
}

impl Sub for TicksTime {
  type Output = TicksTime;
  fn sub(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0.saturating_sub(rhs.0))
  }
}

impl Mul<u64> for TicksTime {
  type Output = TicksTime;
  fn mul(self, rhs: u64) -> Self {
    TicksTime::new(self.0.saturating_mul(rhs))
  }
}

impl Mul<usize> for TicksTime {
  type Output = TicksTime;
  fn mul(self, rhs: usize) -> Self {
    TicksTime::new(self.0.saturating_mul(rhs as u64))
  }
}

impl Div<u64> for TicksTime {
  type Output = TicksTime;
  fn div(self, rhs: u64) -> Self {
    TicksTime::new(self.0 / rhs)
  }
}

impl From<TicksTime> for u64 {
  fn from(item: TicksTime) -> Self {
    item.0
  }
}
