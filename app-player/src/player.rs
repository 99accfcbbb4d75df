use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info};

use failure::Error;

use crossbeam_channel::Select;

use hero_sequencer_core::pattern;
use hero_sequencer_core::time::ClockTime;
use hero_sequencer_core::timeline::PlayState;
use hero_sequencer_core::Sequence;

use crate::config::Config;

pub struct Player {
  sequence: Sequence<String>,
  tick: Duration,
  duration: Duration,
}

impl Player {
  pub fn new<F>(config: &Config, on_step: F) -> Result<Player, Error>
  where
    F: FnMut(ClockTime, &String) + 'static,
  {
    let time_base = Rc::new(config.timing.time_base());
    let tick = config.player.tick(time_base.as_ref())?;
    let duration = config.player.duration(time_base.as_ref())?;

    let pattern = pattern::parse(&config.player.pattern)?;
    debug!("Pattern: {:?}", pattern);

    let sequence = Sequence::new(on_step, pattern, &config.sequence, time_base.clone())?;
    info!(
      "Sequence ready with {} steps at {} bpm, one every {}",
      sequence.len(),
      time_base.get_tempo().get_value(),
      sequence.get_subdivision()
    );

    Ok(Player {
      sequence,
      tick,
      duration,
    })
  }

  /// Play in real time until the configured duration elapses or the sequence stops by itself
  pub fn run(&mut self) -> Result<(), Error> {
    info!("Playing for {:?} ...", self.duration);

    let origin = Instant::now();
    let ticker = crossbeam_channel::tick(self.tick);
    let deadline = crossbeam_channel::after(self.duration);

    self.sequence.start(None, None)?;

    let mut sel = Select::new();
    let tick_index = sel.recv(&ticker);
    let deadline_index = sel.recv(&deadline);

    loop {
      match sel.ready() {
        index if index == tick_index => {
          for instant in ticker.try_recv().into_iter() {
            self.advance(instant.duration_since(origin));
          }
          if self.sequence.get_state() == PlayState::Stopped {
            info!("Sequence finished");
            break;
          }
        }
        index if index == deadline_index => {
          drop(deadline.try_recv());
          self.advance(origin.elapsed());
          break;
        }
        _ => unreachable!(),
      };
    }

    self.close();
    Ok(())
  }

  /// Move the shared clock to `elapsed` since the start of playback
  pub fn advance(&mut self, elapsed: Duration) {
    self.sequence.process(ClockTime::new(elapsed.as_nanos() as u64));
  }

  pub fn close(&mut self) {
    let part = self.sequence.timeline();
    info!(
      "Closing player at {} (position {}) ...",
      part.get_clock(),
      part.get_position()
    );
    self.sequence.stop(None);
    self.sequence.dispose();
  }
}

#[cfg(test)]
mod test {

  use std::cell::RefCell;
  use std::rc::Rc;
  use std::time::Duration;

  use hero_sequencer_core::time::ClockTime;

  use super::Player;
  use crate::config::Config;

  fn player(content: &str) -> (Player, Rc<RefCell<Vec<(u64, String)>>>) {
    let config = Config::from_str(content).unwrap();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = fired.clone();
    let player = Player::new(&config, move |time: ClockTime, note: &String| {
      sink
        .borrow_mut()
        .push((time.units() / 1_000_000, note.clone()))
    })
    .unwrap();
    (player, fired)
  }

  #[test]
  pub fn plays_parsed_pattern() {
    let (mut player, fired) = player(
      r#"
      [player]
      pattern = "a [b c] ~ d"

      [sequence]
      subdivision = "4n"
      loop = false
      "#,
    );
    player.sequence.start(None, None).unwrap();
    player.advance(Duration::from_millis(2500));

    let expected: Vec<(u64, String)> = vec![(0, "a"), (500, "b"), (750, "c"), (1500, "d")]
      .into_iter()
      .map(|(time, note)| (time, note.to_string()))
      .collect();
    assert_eq!(*fired.borrow(), expected);
  }

  #[test]
  pub fn close_stops_firing() {
    let (mut player, fired) = player("[player]\npattern = \"a b\"");
    player.sequence.start(None, None).unwrap();
    player.close();
    player.advance(Duration::from_secs(10));
    assert!(fired.borrow().is_empty());
  }

  #[test]
  pub fn invalid_pattern() {
    let config = Config::from_str("[player]\npattern = \"a [b\"").unwrap();
    assert!(Player::new(&config, |_, _| {}).is_err());
  }

  #[test]
  pub fn runs_until_loop_count_is_done() {
    let (mut player, fired) = player(
      r#"
      [player]
      pattern = "a b"
      duration = "60s"
      tick = "0.001s"

      [sequence]
      subdivision = "0.01s"
      loop = 2
      "#,
    );
    player.run().unwrap();
    assert_eq!(fired.borrow().len(), 4);
  }
}
