use super::{ClockTime, Signature, Tempo, TicksTime};

/// Converts between musical ticks and clock time
pub trait TimeBase {
  fn get_signature(&self) -> Signature;

  fn to_clock(&self, ticks: TicksTime) -> ClockTime;

  fn to_ticks(&self, time: ClockTime) -> TicksTime;
}

/// A time base with a constant tempo and signature
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedTempo {
  signature: Signature,
  tempo: Tempo,
}

impl FixedTempo {
  pub fn new(signature: Signature, tempo: Tempo) -> FixedTempo {
    FixedTempo { signature, tempo }
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }
}

impl TimeBase for FixedTempo {
  fn get_signature(&self) -> Signature {
    self.signature
  }

  fn to_clock(&self, ticks: TicksTime) -> ClockTime {
    ticks.to_clock(self.signature, self.tempo)
  }

  fn to_ticks(&self, time: ClockTime) -> TicksTime {
    time.to_ticks(self.signature, self.tempo)
  }
}

#[cfg(test)]
mod test {

  use super::{FixedTempo, TimeBase};
  use crate::time::{ClockTime, Signature, Tempo, TicksTime};

  #[test]
  pub fn to_clock() {
    let time_base = FixedTempo::new(Signature::new(4, 4), Tempo::new(60));
    let time = time_base.to_clock(TicksTime::from_note_value(4));
    assert_eq!(time, ClockTime::from_seconds(1.0));
    assert_eq!(time_base.get_tempo(), Tempo::new(60));
  }

  #[test]
  pub fn to_ticks() {
    let time_base = FixedTempo::new(Signature::new(4, 4), Tempo::new(120));
    let ticks = time_base.to_ticks(ClockTime::from_millis(250));
    assert_eq!(ticks, TicksTime::from_note_value(8));
  }
}
