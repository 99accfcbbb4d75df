pub mod part;

use std::fmt;

use uuid::Uuid;

use crate::pattern::Step;
use crate::time::{ClockTime, TicksTime};

pub use self::part::Part;

pub type FireCallback<T> = Box<dyn FnMut(ClockTime, &Step<T>)>;

/// Jitter used when humanize is enabled without an explicit amount
pub const DEFAULT_HUMANIZE_MILLIS: u64 = 20;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct EntryId(Uuid);

impl EntryId {
  pub fn new() -> EntryId {
    EntryId(Uuid::new_v4())
  }
}

impl fmt::Display for EntryId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlayState {
  Stopped,
  Started,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LoopMode {
  Off,
  Forever,
  /// Play the loop window this many times, then stop
  Count(u32),
}

impl LoopMode {
  pub fn is_enabled(&self) -> bool {
    match self {
      LoopMode::Off => false,
      LoopMode::Forever => true,
      LoopMode::Count(count) => *count > 0,
    }
  }
}

impl From<bool> for LoopMode {
  fn from(enabled: bool) -> Self {
    if enabled {
      LoopMode::Forever
    } else {
      LoopMode::Off
    }
  }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Humanize {
  Off,
  Default,
  Amount(ClockTime),
}

impl Humanize {
  /// Maximum deviation applied to a fire time, either way
  pub fn amount(&self) -> ClockTime {
    match self {
      Humanize::Off => ClockTime::zero(),
      Humanize::Default => ClockTime::from_millis(DEFAULT_HUMANIZE_MILLIS),
      Humanize::Amount(amount) => *amount,
    }
  }
}

impl From<bool> for Humanize {
  fn from(enabled: bool) -> Self {
    if enabled {
      Humanize::Default
    } else {
      Humanize::Off
    }
  }
}

/// Flat schedule of steps at absolute times, fired while its clock is processed
pub trait Timeline<T> {
  /// Replace the callback invoked for every fired entry
  fn set_callback(&mut self, callback: FireCallback<T>);

  /// Register a step at `time`, relative to the timeline start
  fn add(&mut self, time: ClockTime, step: Step<T>) -> EntryId;

  fn remove(&mut self, id: EntryId) -> bool;

  /// Drop every entry. Nothing registered before this call fires afterwards.
  fn clear(&mut self);

  /// Start at `time` on the shared clock (now when `None`), from position `offset`
  fn start(&mut self, time: Option<ClockTime>, offset: Option<ClockTime>);

  fn stop(&mut self, time: Option<ClockTime>);

  fn get_state(&self) -> PlayState;

  fn set_loop(&mut self, mode: LoopMode);
  fn get_loop(&self) -> LoopMode;

  fn set_loop_start(&mut self, time: ClockTime);
  fn get_loop_start(&self) -> ClockTime;

  fn set_loop_end(&mut self, time: ClockTime);
  fn get_loop_end(&self) -> ClockTime;

  fn set_start_offset(&mut self, offset: TicksTime);
  fn get_start_offset(&self) -> TicksTime;

  fn set_playback_rate(&mut self, rate: f64);
  fn get_playback_rate(&self) -> f64;

  fn set_probability(&mut self, probability: f64);
  fn get_probability(&self) -> f64;

  fn set_humanize(&mut self, humanize: Humanize);
  fn get_humanize(&self) -> Humanize;

  fn set_mute(&mut self, mute: bool);
  fn is_mute(&self) -> bool;

  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Advance the shared clock to `now`, firing every entry that became due
  fn process(&mut self, now: ClockTime);

  /// Cancel everything. Later calls to `process` never fire.
  fn dispose(&mut self);
}
