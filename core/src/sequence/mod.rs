pub mod index;

use std::rc::Rc;

use failure::Fail;
use log::{debug, warn};

use crate::config::SequenceConfig;
use crate::pattern::{flatten, Edit, Pattern, PatternError, Step, TrackedPattern};
use crate::time::{ClockTime, Notation, NotationError, TicksTime, TimeBase};
use crate::timeline::{FireCallback, Humanize, LoopMode, Part, PlayState, Timeline};

use self::index::IndexTime;

#[derive(Debug, Fail, PartialEq)]
pub enum SequenceError {
  #[fail(display = "The sequence has been disposed")]
  Disposed,

  #[fail(display = "Invalid pattern: {}", cause)]
  InvalidPattern { cause: PatternError },

  #[fail(display = "Invalid subdivision '{}'", subdivision)]
  InvalidSubdivision { subdivision: String },

  #[fail(display = "Invalid humanize amount: {}", cause)]
  InvalidHumanize { cause: NotationError },

  #[fail(display = "Playback rate must be greater than zero, got {}", rate)]
  InvalidPlaybackRate { rate: f64 },

  #[fail(display = "Probability must be within [0, 1], got {}", probability)]
  InvalidProbability { probability: f64 },
}

impl From<PatternError> for SequenceError {
  fn from(cause: PatternError) -> Self {
    SequenceError::InvalidPattern { cause }
  }
}

/// Wrap the caller's callback so that silent steps keep their slot but never reach it
fn skip_silence<T, F>(mut callback: F) -> FireCallback<T>
where
  T: 'static,
  F: FnMut(ClockTime, &T) + 'static,
{
  Box::new(move |time: ClockTime, step: &Step<T>| {
    if let Step::Sound(value) = step {
      callback(time, value);
    }
  })
}

/// A nested pattern laid out over a timeline, rebuilt as a whole on every edit
pub struct Sequence<T, L = Part<T>> {
  timeline: L,
  time_base: Rc<dyn TimeBase>,
  subdivision: TicksTime,
  pattern: TrackedPattern<T>,
  loop_start: usize,
  loop_end: usize,
  disposed: bool,
}

impl<T> Sequence<T, Part<T>>
where
  T: Clone + 'static,
{
  pub fn new<F>(
    callback: F,
    pattern: Vec<Pattern<T>>,
    config: &SequenceConfig,
    time_base: Rc<dyn TimeBase>,
  ) -> Result<Self, SequenceError>
  where
    F: FnMut(ClockTime, &T) + 'static,
  {
    Self::with_timeline(Part::new(), callback, pattern, config, time_base)
  }
}

impl<T, L> Sequence<T, L>
where
  T: Clone + 'static,
  L: Timeline<T>,
{
  pub fn with_timeline<F>(
    mut timeline: L,
    callback: F,
    pattern: Vec<Pattern<T>>,
    config: &SequenceConfig,
    time_base: Rc<dyn TimeBase>,
  ) -> Result<Self, SequenceError>
  where
    F: FnMut(ClockTime, &T) + 'static,
  {
    let invalid_subdivision = || SequenceError::InvalidSubdivision {
      subdivision: config.subdivision.clone(),
    };
    let subdivision = config
      .subdivision
      .parse::<Notation>()
      .map_err(|_| invalid_subdivision())?
      .to_ticks(time_base.as_ref());
    if subdivision.is_zero() {
      return Err(invalid_subdivision());
    }

    let humanize = config
      .humanize
      .resolve(time_base.as_ref())
      .map_err(|cause| SequenceError::InvalidHumanize { cause })?;

    timeline.set_callback(skip_silence(callback));

    let mut sequence = Sequence {
      timeline,
      time_base,
      subdivision,
      pattern: TrackedPattern::new(pattern),
      loop_start: config.loop_start,
      loop_end: config.loop_end,
      disposed: false,
    };

    sequence.rebuild()?;
    sequence.set_loop(LoopMode::from(config.looping))?;
    sequence.set_playback_rate(config.playback_rate)?;
    sequence.set_probability(config.probability)?;
    sequence.set_humanize(humanize)?;
    sequence.set_mute(config.mute)?;

    Ok(sequence)
  }

  pub fn start(
    &mut self,
    time: Option<ClockTime>,
    offset: Option<usize>,
  ) -> Result<(), SequenceError> {
    self.check_disposed()?;
    let offset = offset.map(|index| self.index_time().time(index));
    self.timeline.start(time, offset);
    Ok(())
  }

  pub fn stop(&mut self, time: Option<ClockTime>) {
    self.timeline.stop(time);
  }

  /// Remove every scheduled step. The play state is left alone.
  pub fn clear(&mut self) {
    self.timeline.clear();
  }

  pub fn dispose(&mut self) {
    if !self.disposed {
      debug!("Disposing sequence at revision {}", self.pattern.revision());
      self.disposed = true;
    }
    self.timeline.dispose();
    self.pattern = TrackedPattern::new(Vec::new());
  }

  pub fn is_disposed(&self) -> bool {
    self.disposed
  }

  /// Advance the shared clock, firing the steps that became due
  pub fn process(&mut self, now: ClockTime) {
    self.timeline.process(now);
  }

  pub fn get_state(&self) -> PlayState {
    self.timeline.get_state()
  }

  pub fn timeline(&self) -> &L {
    &self.timeline
  }

  pub fn get_pattern(&self) -> &[Pattern<T>] {
    self.pattern.root()
  }

  pub fn set_pattern(&mut self, root: Vec<Pattern<T>>) -> Result<(), SequenceError> {
    self.apply(|pattern| Ok(pattern.replace(root)))
  }

  pub fn get_at(&self, path: &[usize]) -> Option<&Pattern<T>> {
    self.pattern.get(path)
  }

  pub fn set_at<P>(&mut self, path: &[usize], value: P) -> Result<(), SequenceError>
  where
    P: Into<Pattern<T>>,
  {
    self.apply(|pattern| pattern.set_at(path, value))
  }

  pub fn insert_at<P>(&mut self, path: &[usize], value: P) -> Result<(), SequenceError>
  where
    P: Into<Pattern<T>>,
  {
    self.apply(|pattern| pattern.insert_at(path, value))
  }

  pub fn remove_at(&mut self, path: &[usize]) -> Result<(), SequenceError> {
    self.apply(|pattern| pattern.remove_at(path))
  }

  /// Number of accepted pattern edits
  pub fn revision(&self) -> u64 {
    self.pattern.revision()
  }

  /// Duration of one root slot
  pub fn get_subdivision(&self) -> ClockTime {
    self.time_base.to_clock(self.subdivision)
  }

  pub fn get_subdivision_ticks(&self) -> TicksTime {
    self.subdivision
  }

  pub fn set_loop_start(&mut self, index: usize) -> Result<(), SequenceError> {
    self.check_disposed()?;
    self.loop_start = index;
    let time = self.index_time().time(index);
    self.timeline.set_loop_start(time);
    Ok(())
  }

  pub fn get_loop_start(&self) -> usize {
    self.loop_start
  }

  /// Set the index the loop ends at, 0 meaning the end of the pattern
  pub fn set_loop_end(&mut self, index: usize) -> Result<(), SequenceError> {
    self.check_disposed()?;
    self.loop_end = index;
    let time = self.index_time().loop_end(index, self.pattern.len());
    self.timeline.set_loop_end(time);
    Ok(())
  }

  pub fn get_loop_end(&self) -> usize {
    self.loop_end
  }

  pub fn set_loop(&mut self, mode: LoopMode) -> Result<(), SequenceError> {
    self.check_disposed()?;
    self.timeline.set_loop(mode);
    Ok(())
  }

  pub fn get_loop(&self) -> LoopMode {
    self.timeline.get_loop()
  }

  /// Shift the whole pattern, and rebuild so every step moves with it
  pub fn set_start_offset(&mut self, offset: TicksTime) -> Result<(), SequenceError> {
    self.check_disposed()?;
    self.timeline.set_start_offset(offset);
    self.rebuild()
  }

  pub fn get_start_offset(&self) -> TicksTime {
    self.timeline.get_start_offset()
  }

  pub fn set_playback_rate(&mut self, rate: f64) -> Result<(), SequenceError> {
    self.check_disposed()?;
    if !(rate > 0.0 && rate.is_finite()) {
      return Err(SequenceError::InvalidPlaybackRate { rate });
    }
    self.timeline.set_playback_rate(rate);
    Ok(())
  }

  pub fn get_playback_rate(&self) -> f64 {
    self.timeline.get_playback_rate()
  }

  pub fn set_probability(&mut self, probability: f64) -> Result<(), SequenceError> {
    self.check_disposed()?;
    if !(0.0..=1.0).contains(&probability) {
      return Err(SequenceError::InvalidProbability { probability });
    }
    self.timeline.set_probability(probability);
    Ok(())
  }

  pub fn get_probability(&self) -> f64 {
    self.timeline.get_probability()
  }

  pub fn set_humanize(&mut self, humanize: Humanize) -> Result<(), SequenceError> {
    self.check_disposed()?;
    self.timeline.set_humanize(humanize);
    Ok(())
  }

  pub fn get_humanize(&self) -> Humanize {
    self.timeline.get_humanize()
  }

  pub fn set_mute(&mut self, mute: bool) -> Result<(), SequenceError> {
    self.check_disposed()?;
    self.timeline.set_mute(mute);
    Ok(())
  }

  pub fn is_mute(&self) -> bool {
    self.timeline.is_mute()
  }

  /// Number of scheduled steps, silent ones included
  pub fn len(&self) -> usize {
    self.timeline.len()
  }

  pub fn is_empty(&self) -> bool {
    self.timeline.is_empty()
  }

  fn check_disposed(&self) -> Result<(), SequenceError> {
    if self.disposed {
      Err(SequenceError::Disposed)
    } else {
      Ok(())
    }
  }

  fn index_time(&self) -> IndexTime {
    IndexTime::new(
      self.time_base.as_ref(),
      self.subdivision,
      self.timeline.get_start_offset(),
    )
  }

  /// Apply one edit and rebuild, or leave both the pattern and the schedule untouched
  fn apply<E>(&mut self, edit: E) -> Result<(), SequenceError>
  where
    E: FnOnce(&mut TrackedPattern<T>) -> Result<Edit<T>, PatternError>,
  {
    self.check_disposed()?;
    let edit = edit(&mut self.pattern)?;
    if let Err(err) = self.rebuild() {
      // keep the previous schedule registered
      warn!("Rejected pattern edit: {}", err);
      self.pattern.revert(edit)?;
      return Err(err);
    }
    Ok(())
  }

  /// Lay out the whole pattern again
  fn rebuild(&mut self) -> Result<(), SequenceError> {
    let start_offset = self.timeline.get_start_offset();
    let entries = flatten(self.pattern.root(), self.subdivision, start_offset)?;

    // only touch the timeline once the whole pattern laid out
    self.timeline.clear();
    for entry in entries {
      let time = self.time_base.to_clock(entry.offset);
      self.timeline.add(time, entry.step);
    }

    let index_time = self.index_time();
    let loop_start = index_time.time(self.loop_start);
    let loop_end = index_time.loop_end(self.loop_end, self.pattern.len());
    self.timeline.set_loop_start(loop_start);
    self.timeline.set_loop_end(loop_end);

    debug!(
      "Rebuilt sequence at revision {} with {} steps",
      self.pattern.revision(),
      self.timeline.len()
    );
    Ok(())
  }
}
