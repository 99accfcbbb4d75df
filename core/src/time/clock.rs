use std::convert::TryFrom;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::{Signature, Tempo, TicksTime};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

pub type UnitType = u64;
pub const UNITS_PER_SECOND: UnitType = NANOS_PER_SECOND as UnitType;
pub const UNITS_PER_NANO: UnitType = NANOS_PER_SECOND / UNITS_PER_SECOND;

const SECONDS_PER_MINUTE: u64 = 60;
pub const UNITS_PER_MINUTE: u64 = UNITS_PER_SECOND * SECONDS_PER_MINUTE;

pub type Seconds = f64;

/// High resolution time on the shared clock
#[derive(Debug, Default, PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
pub struct ClockTime(UnitType);

impl ClockTime {
  pub fn zero() -> ClockTime {
    ClockTime(0)
  }

  pub fn new(units: UnitType) -> ClockTime {
    ClockTime(units)
  }

  pub fn from_seconds(seconds: Seconds) -> ClockTime {
    ClockTime((seconds.max(0.0) * UNITS_PER_SECOND as f64).round() as UnitType)
  }

  pub fn from_millis(millis: u64) -> ClockTime {
    ClockTime(millis.saturating_mul(UNITS_PER_SECOND / 1000))
  }

  pub fn units(&self) -> UnitType {
    self.0
  }

  pub fn to_nanos(&self) -> u64 {
    self.0 as u64 / UNITS_PER_NANO
  }

  pub fn to_seconds(&self) -> Seconds {
    self.0 as f64 / UNITS_PER_SECOND as f64
  }

  pub fn to_ticks(&self, signature: Signature, tempo: Tempo) -> TicksTime {
    let ticks_per_minute = u64::from(TicksTime::per_minute(signature, tempo));
    let ticks = u128::from(self.0) * u128::from(ticks_per_minute) / u128::from(UNITS_PER_MINUTE);
    TicksTime::new(u64::try_from(ticks).unwrap_or(u64::MAX))
  }

  /// Stretch a duration by a playback rate (2.0 covers twice the material)
  pub fn scale(self, rate: f64) -> ClockTime {
    ClockTime((self.0 as f64 * rate).round() as UnitType)
  }

  /// Inverse of `scale`
  pub fn unscale(self, rate: f64) -> ClockTime {
    ClockTime((self.0 as f64 / rate).round() as UnitType)
  }
}

impl fmt::Display for ClockTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:.3}s", self.to_seconds())
  }
}

impl Add for ClockTime {
  type Output = ClockTime;

  fn add(self, rhs: ClockTime) -> ClockTime {
    ClockTime(self.0.saturating_add(rhs.0))
  }
}

impl AddAssign for ClockTime {
  fn add_assign(&mut self, rhs: ClockTime) {
    *self = *self + rhs;
  }
}

impl Sub for ClockTime {
  type Output = ClockTime;

  fn sub(self, rhs: ClockTime) -> ClockTime {
    ClockTime(self.0.saturating_sub(rhs.0))
  }
}

impl SubAssign for ClockTime {
  fn sub_assign(&mut self, rhs: ClockTime) {
    *self = *self - rhs;
  }
}

#[cfg(test)]
mod test {
  use super::ClockTime;

  #[test]
  pub fn clock_time_from_seconds() {
    let time = ClockTime::from_seconds(1.5);
    assert_eq!(time.units(), 1_500_000_000);
    assert_eq!(time.to_seconds(), 1.5);
  }

  #[test]
  pub fn clock_time_from_negative_seconds() {
    assert_eq!(ClockTime::from_seconds(-0.5), ClockTime::zero());
  }

  #[test]
  pub fn clock_time_from_millis() {
    assert_eq!(ClockTime::from_millis(250), ClockTime::new(250_000_000));
  }

  #[test]
  pub fn clock_time_add() {
    let time1 = ClockTime::new(15);
    let time2 = ClockTime::new(5);
    assert_eq!(time1 + time2, ClockTime::new(20));
  }

  #[test]
  pub fn clock_time_add_saturates() {
    let time = ClockTime::new(u64::MAX - 1);
    assert_eq!(time + ClockTime::new(5), ClockTime::new(u64::MAX));
  }

  #[test]
  pub fn clock_time_sub_saturates() {
    let time1 = ClockTime::new(5);
    let time2 = ClockTime::new(15);
    assert_eq!(time2 - time1, ClockTime::new(10));
    assert_eq!(time1 - time2, ClockTime::zero());
  }

  #[test]
  pub fn clock_time_scale() {
    let time = ClockTime::new(1000);
    assert_eq!(time.scale(2.0), ClockTime::new(2000));
    assert_eq!(time.unscale(2.0), ClockTime::new(500));
  }

  #[test]
  pub fn clock_time_display() {
    assert_eq!(ClockTime::from_millis(1250).to_string(), "1.250s");
  }
}
