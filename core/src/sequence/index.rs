use crate::time::{ClockTime, TicksTime, TimeBase};

/// Maps root pattern indices to positions on the timeline
pub struct IndexTime<'a> {
  time_base: &'a dyn TimeBase,
  subdivision: TicksTime,
  start_offset: TicksTime,
}

impl<'a> IndexTime<'a> {
  pub fn new(
    time_base: &'a dyn TimeBase,
    subdivision: TicksTime,
    start_offset: TicksTime,
  ) -> IndexTime<'a> {
    IndexTime {
      time_base,
      subdivision,
      start_offset,
    }
  }

  pub fn ticks(&self, index: usize) -> TicksTime {
    self.subdivision * index + self.start_offset
  }

  pub fn time(&self, index: usize) -> ClockTime {
    self.time_base.to_clock(self.ticks(index))
  }

  /// End of the loop window. An index of 0 stands for the whole pattern, not an empty window.
  pub fn loop_end(&self, index: usize, pattern_len: usize) -> ClockTime {
    if index == 0 {
      self.time(pattern_len)
    } else {
      self.time(index)
    }
  }
}
