use std::cmp::max;

use log::{debug, trace, warn};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pattern::Step;
use crate::time::{ClockTime, TicksTime};

use super::{EntryId, FireCallback, Humanize, LoopMode, PlayState, Timeline};

struct Entry<T> {
  id: EntryId,
  time: ClockTime,
  step: Step<T>,
}

/// A timeline driven by explicit clock updates.
///
/// Positions inside the part are measured in clock units at a playback rate of 1. The part maps
/// them to the shared clock using the time it was started at and its playback rate.
pub struct Part<T> {
  callback: Option<FireCallback<T>>,
  entries: Vec<Entry<T>>,

  state: PlayState,
  clock: ClockTime,
  start_time: ClockTime,
  stop_time: Option<ClockTime>,
  position: ClockTime,

  loop_mode: LoopMode,
  loop_start: ClockTime,
  loop_end: ClockTime,
  loops_played: u32,

  start_offset: TicksTime,
  playback_rate: f64,
  probability: f64,
  humanize: Humanize,
  mute: bool,

  rng: StdRng,
  disposed: bool,
}

impl<T> Part<T> {
  pub fn new() -> Part<T> {
    Self::with_rng(StdRng::from_entropy())
  }

  /// Part whose probability and humanize decisions are reproducible
  pub fn with_seed(seed: u64) -> Part<T> {
    Self::with_rng(StdRng::seed_from_u64(seed))
  }

  fn with_rng(rng: StdRng) -> Part<T> {
    Part {
      callback: None,
      entries: Vec::new(),

      state: PlayState::Stopped,
      clock: ClockTime::zero(),
      start_time: ClockTime::zero(),
      stop_time: None,
      position: ClockTime::zero(),

      loop_mode: LoopMode::Off,
      loop_start: ClockTime::zero(),
      loop_end: ClockTime::zero(),
      loops_played: 0,

      start_offset: TicksTime::zero(),
      playback_rate: 1.0,
      probability: 1.0,
      humanize: Humanize::Off,
      mute: false,

      rng,
      disposed: false,
    }
  }

  /// Last time the shared clock was processed at
  pub fn get_clock(&self) -> ClockTime {
    self.clock
  }

  /// Next position to be played inside the part
  pub fn get_position(&self) -> ClockTime {
    self.position
  }

  /// Whether the loop window is enabled and not empty
  fn loop_active(&self) -> bool {
    self.loop_mode.is_enabled() && self.loop_start < self.loop_end
  }

  /// Determine whether or not to move the position back to the start of the loop
  fn crossing_loop_end(&self, position: ClockTime, next_position: ClockTime) -> bool {
    self.loop_active() && position < self.loop_end && self.loop_end <= next_position
  }

  /// Play `elapsed` clock time starting at `clock`, wrapping around the loop window
  fn play(&mut self, clock: ClockTime, elapsed: ClockTime) {
    let rate = self.playback_rate;
    let mut clock = clock;
    let mut remaining = elapsed.scale(rate);

    while remaining > ClockTime::zero() && self.state == PlayState::Started {
      let end_position = self.position + remaining;

      if self.crossing_loop_end(self.position, end_position) {
        let segment = self.loop_end - self.position;
        self.fire(self.position, self.loop_end, clock);
        clock += segment.unscale(rate);
        remaining -= segment;
        // play up to the loop end and jump back to the loop start
        self.loops_played += 1;

        if let LoopMode::Count(count) = self.loop_mode {
          if self.loops_played >= count {
            debug!("Part finished after {} loops at {}", self.loops_played, clock);
            self.position = self.loop_end;
            self.state = PlayState::Stopped;
            break;
          }
        }
        self.position = self.loop_start;
      } else {
        self.fire(self.position, end_position, clock);
        self.position = end_position;
        remaining = ClockTime::zero();
      }
    }
  }

  /// Fire the entries positioned in `[from, to)`, where `from` is played at `clock`
  fn fire(&mut self, from: ClockTime, to: ClockTime, clock: ClockTime) {
    if self.mute {
      return;
    }

    let callback = match self.callback.as_mut() {
      Some(callback) => callback,
      None => return,
    };

    let first = self.entries.partition_point(|entry| entry.time < from);
    let last = self.entries.partition_point(|entry| entry.time < to);

    for entry in &self.entries[first..last] {
      if self.probability < 1.0 && self.rng.gen::<f64>() >= self.probability {
        trace!("Skipping entry {} at {}", entry.id, entry.time);
        continue;
      }

      let mut time = clock + (entry.time - from).unscale(self.playback_rate);

      let amount = self.humanize.amount();
      if amount > ClockTime::zero() {
        let jitter: f64 = self.rng.gen_range(-1.0..=1.0);
        let deviation = amount.scale(jitter.abs());
        time = if jitter < 0.0 {
          time - deviation
        } else {
          time + deviation
        };
      }

      trace!("Firing entry {} at {}", entry.id, time);
      callback(time, &entry.step);
    }
  }
}

impl<T> Default for Part<T> {
  fn default() -> Self {
    Part::new()
  }
}

impl<T> Timeline<T> for Part<T> {
  fn set_callback(&mut self, callback: FireCallback<T>) {
    self.callback = Some(callback);
  }

  fn add(&mut self, time: ClockTime, step: Step<T>) -> EntryId {
    let id = EntryId::new();
    let index = self.entries.partition_point(|entry| entry.time <= time);
    self.entries.insert(index, Entry { id, time, step });
    id
  }

  fn remove(&mut self, id: EntryId) -> bool {
    match self.entries.iter().position(|entry| entry.id == id) {
      Some(index) => {
        self.entries.remove(index);
        true
      }
      None => false,
    }
  }

  fn clear(&mut self) {
    self.entries.clear();
  }

  fn start(&mut self, time: Option<ClockTime>, offset: Option<ClockTime>) {
    if self.disposed {
      return;
    }

    // never start in the past
    let start_time = max(time.unwrap_or(self.clock), self.clock);
    let position = offset.unwrap_or_else(|| {
      if self.loop_active() {
        self.loop_start
      } else {
        ClockTime::zero()
      }
    });

    debug!("Starting part at {} from position {}", start_time, position);

    self.state = PlayState::Started;
    self.start_time = start_time;
    self.stop_time = None;
    self.position = position;
    self.loops_played = 0;
  }

  fn stop(&mut self, time: Option<ClockTime>) {
    if self.state == PlayState::Stopped {
      return;
    }

    match time {
      Some(time) if time > self.clock => {
        debug!("Stopping part at {}", time);
        self.stop_time = Some(time);
      }
      _ => {
        debug!("Stopping part at {}", self.clock);
        self.state = PlayState::Stopped;
        self.stop_time = None;
      }
    }
  }

  fn get_state(&self) -> PlayState {
    self.state
  }

  fn set_loop(&mut self, mode: LoopMode) {
    self.loop_mode = mode;
  }

  fn get_loop(&self) -> LoopMode {
    self.loop_mode
  }

  fn set_loop_start(&mut self, time: ClockTime) {
    self.loop_start = time;
  }

  fn get_loop_start(&self) -> ClockTime {
    self.loop_start
  }

  fn set_loop_end(&mut self, time: ClockTime) {
    self.loop_end = time;
  }

  fn get_loop_end(&self) -> ClockTime {
    self.loop_end
  }

  fn set_start_offset(&mut self, offset: TicksTime) {
    self.start_offset = offset;
  }

  fn get_start_offset(&self) -> TicksTime {
    self.start_offset
  }

  fn set_playback_rate(&mut self, rate: f64) {
    if rate > 0.0 && rate.is_finite() {
      self.playback_rate = rate;
    } else {
      warn!("Ignoring invalid playback rate {}", rate);
    }
  }

  fn get_playback_rate(&self) -> f64 {
    self.playback_rate
  }

  fn set_probability(&mut self, probability: f64) {
    self.probability = probability.max(0.0).min(1.0);
  }

  fn get_probability(&self) -> f64 {
    self.probability
  }

  fn set_humanize(&mut self, humanize: Humanize) {
    self.humanize = humanize;
  }

  fn get_humanize(&self) -> Humanize {
    self.humanize
  }

  fn set_mute(&mut self, mute: bool) {
    self.mute = mute;
  }

  fn is_mute(&self) -> bool {
    self.mute
  }

  fn len(&self) -> usize {
    self.entries.len()
  }

  fn process(&mut self, now: ClockTime) {
    if self.disposed || now <= self.clock {
      return;
    }

    if self.state == PlayState::Started {
      let until = match self.stop_time {
        Some(stop_time) if stop_time < now => stop_time,
        _ => now,
      };
      let from = max(self.clock, self.start_time);
      if from < until {
        self.play(from, until - from);
      }

      if let Some(stop_time) = self.stop_time {
        if stop_time <= now {
          self.state = PlayState::Stopped;
          self.stop_time = None;
        }
      }
    }

    self.clock = now;
  }

  fn dispose(&mut self) {
    if !self.disposed {
      debug!("Disposing part with {} entries", self.entries.len());
    }
    self.entries.clear();
    self.callback = None;
    self.state = PlayState::Stopped;
    self.stop_time = None;
    self.disposed = true;
  }
}
