use super::{ticks::TICKS_PER_WHOLE, TicksTime};

pub const DEFAULT_SIGNATURE_NUM_BEATS: u8 = 4;
pub const DEFAULT_SIGNATURE_NOTE_VALUE: u8 = 4;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Signature {
  num_beats: u8,  // numerator
  note_value: u8, // denominator
}

impl Signature {
  pub fn new(num_beats: u8, note_value: u8) -> Signature {
    assert!(note_value > 0 && note_value <= 16);
    Signature {
      num_beats,
      note_value,
    }
  }

  pub fn get_num_beats(&self) -> u8 {
    self.num_beats
  }

  pub fn get_note_value(&self) -> u8 {
    self.note_value
  }

  pub fn beat_ticks(&self) -> TicksTime {
    TicksTime::new(TICKS_PER_WHOLE / u64::from(self.note_value))
  }

  pub fn bar_ticks(&self) -> TicksTime {
    self.beat_ticks() * u64::from(self.num_beats)
  }
}

impl Default for Signature {
  fn default() -> Signature {
    Signature::new(DEFAULT_SIGNATURE_NUM_BEATS, DEFAULT_SIGNATURE_NOTE_VALUE)
  }
}
