use std::fmt;
use std::str::FromStr;

use failure::Fail;

use super::{ClockTime, Seconds, TicksTime, TimeBase};

#[derive(Debug, Fail, PartialEq)]
pub enum NotationError {
  #[fail(display = "Empty time notation")]
  Empty,

  #[fail(display = "Invalid time notation '{}'", notation)]
  Invalid { notation: String },

  #[fail(display = "Note value must be greater than zero in '{}'", notation)]
  ZeroNoteValue { notation: String },
}

/// Musical duration as written in configurations: "4n", "8t", "8n.", "1m", "480i", "0.5s"
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Notation {
  Note(u16),
  Triplet(u16),
  Dotted(u16),
  Measures(u32),
  Ticks(u64),
  Seconds(Seconds),
}

impl Notation {
  pub fn to_ticks(&self, time_base: &dyn TimeBase) -> TicksTime {
    match *self {
      Notation::Note(value) => TicksTime::from_note_value(value),
      Notation::Triplet(value) => TicksTime::from_note_value(value) * 2u64 / 3,
      Notation::Dotted(value) => TicksTime::from_note_value(value) * 3u64 / 2,
      Notation::Measures(count) => time_base.get_signature().bar_ticks() * u64::from(count),
      Notation::Ticks(ticks) => TicksTime::new(ticks),
      Notation::Seconds(seconds) => time_base.to_ticks(ClockTime::from_seconds(seconds)),
    }
  }

  pub fn to_clock(&self, time_base: &dyn TimeBase) -> ClockTime {
    match *self {
      Notation::Seconds(seconds) => ClockTime::from_seconds(seconds),
      _ => time_base.to_clock(self.to_ticks(time_base)),
    }
  }

  fn note_value(digits: &str, notation: &str) -> Result<u16, NotationError> {
    let value = digits.parse::<u16>().map_err(|_| NotationError::Invalid {
      notation: notation.to_string(),
    })?;
    if value == 0 {
      Err(NotationError::ZeroNoteValue {
        notation: notation.to_string(),
      })
    } else {
      Ok(value)
    }
  }

  fn seconds(digits: &str, notation: &str) -> Result<Seconds, NotationError> {
    match digits.parse::<Seconds>() {
      Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
      _ => Err(NotationError::Invalid {
        notation: notation.to_string(),
      }),
    }
  }
}

impl FromStr for Notation {
  type Err = NotationError;

  fn from_str(s: &str) -> Result<Notation, NotationError> {
    let notation = s.trim();
    if notation.is_empty() {
      return Err(NotationError::Empty);
    }

    let invalid = || NotationError::Invalid {
      notation: notation.to_string(),
    };

    if let Some(digits) = notation.strip_suffix("n.") {
      Notation::note_value(digits, notation).map(Notation::Dotted)
    } else if let Some(digits) = notation.strip_suffix('n') {
      Notation::note_value(digits, notation).map(Notation::Note)
    } else if let Some(digits) = notation.strip_suffix('t') {
      Notation::note_value(digits, notation).map(Notation::Triplet)
    } else if let Some(digits) = notation.strip_suffix('m') {
      digits.parse::<u32>().map(Notation::Measures).map_err(|_| invalid())
    } else if let Some(digits) = notation.strip_suffix('i') {
      digits.parse::<u64>().map(Notation::Ticks).map_err(|_| invalid())
    } else if let Some(digits) = notation.strip_suffix('s') {
      Notation::seconds(digits, notation).map(Notation::Seconds)
    } else {
      Notation::seconds(notation, notation).map(Notation::Seconds)
    }
  }
}

impl fmt::Display for Notation {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Notation::Note(value) => write!(f, "{}n", value),
      Notation::Triplet(value) => write!(f, "{}t", value),
      Notation::Dotted(value) => write!(f, "{}n.", value),
      Notation::Measures(count) => write!(f, "{}m", count),
      Notation::Ticks(ticks) => write!(f, "{}i", ticks),
      Notation::Seconds(seconds) => write!(f, "{}s", seconds),
    }
  }
}

#[cfg(test)]
mod test {

  use super::{Notation, NotationError};
  use crate::time::{
    ticks::TICKS_RESOLUTION, ClockTime, FixedTempo, Signature, Tempo, TicksTime,
  };

  fn time_base() -> FixedTempo {
    FixedTempo::new(Signature::new(3, 4), Tempo::new(120))
  }

  #[test]
  pub fn parse() {
    assert_eq!("8n".parse::<Notation>(), Ok(Notation::Note(8)));
    assert_eq!("4t".parse::<Notation>(), Ok(Notation::Triplet(4)));
    assert_eq!("4n.".parse::<Notation>(), Ok(Notation::Dotted(4)));
    assert_eq!("2m".parse::<Notation>(), Ok(Notation::Measures(2)));
    assert_eq!("480i".parse::<Notation>(), Ok(Notation::Ticks(480)));
    assert_eq!("0.25s".parse::<Notation>(), Ok(Notation::Seconds(0.25)));
    assert_eq!(" 1.5 ".parse::<Notation>(), Ok(Notation::Seconds(1.5)));
  }

  #[test]
  pub fn parse_errors() {
    assert_eq!("".parse::<Notation>(), Err(NotationError::Empty));
    assert_eq!(
      "0n".parse::<Notation>(),
      Err(NotationError::ZeroNoteValue {
        notation: "0n".to_string()
      })
    );
    assert_eq!(
      "quarter".parse::<Notation>(),
      Err(NotationError::Invalid {
        notation: "quarter".to_string()
      })
    );
    assert!("-1s".parse::<Notation>().is_err());
  }

  #[test]
  pub fn to_ticks() {
    let time_base = time_base();
    assert_eq!(
      Notation::Note(16).to_ticks(&time_base),
      TicksTime::new(TICKS_RESOLUTION)
    );
    assert_eq!(
      Notation::Triplet(8).to_ticks(&time_base),
      TicksTime::new(TICKS_RESOLUTION * 4 / 3)
    );
    assert_eq!(
      Notation::Dotted(8).to_ticks(&time_base),
      TicksTime::new(TICKS_RESOLUTION * 3)
    );
    assert_eq!(
      Notation::Measures(1).to_ticks(&time_base),
      TicksTime::new(TICKS_RESOLUTION * 12)
    );
    assert_eq!(
      Notation::Seconds(0.5).to_ticks(&time_base),
      TicksTime::from_note_value(4)
    );
  }

  #[test]
  pub fn to_clock() {
    let time_base = time_base();
    assert_eq!(Notation::Note(8).to_clock(&time_base), ClockTime::from_millis(250));
    assert_eq!(Notation::Seconds(0.02).to_clock(&time_base), ClockTime::from_millis(20));
  }

  #[test]
  pub fn display() {
    assert_eq!(Notation::Dotted(8).to_string(), "8n.");
    assert_eq!(Notation::Measures(2).to_string(), "2m");
  }
}
