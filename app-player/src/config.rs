use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;
use std::time::Duration;

use hero_sequencer_core::config::{SequenceConfig, Timing};
use hero_sequencer_core::time::{Notation, TimeBase};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub player: Player,
  pub timing: Timing,
  pub sequence: SequenceConfig,
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
  }

  #[allow(dead_code)]
  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Player {
  /// Mini-notation, as in `"C4 [E4 G4] ~"`
  pub pattern: String,
  /// How long to play for
  pub duration: String,
  /// Interval between clock updates
  pub tick: String,
}

impl Default for Player {
  fn default() -> Player {
    Player {
      pattern: String::new(),
      duration: "4m".to_string(),
      tick: "0.005s".to_string(),
    }
  }
}

impl Player {
  pub fn duration(&self, time_base: &dyn TimeBase) -> Result<Duration, Error> {
    Self::resolve(&self.duration, time_base)
  }

  pub fn tick(&self, time_base: &dyn TimeBase) -> Result<Duration, Error> {
    Self::resolve(&self.tick, time_base)
  }

  fn resolve(notation: &str, time_base: &dyn TimeBase) -> Result<Duration, Error> {
    let time = notation.parse::<Notation>()?.to_clock(time_base);
    Ok(Duration::from_nanos(time.to_nanos()))
  }
}

#[cfg(test)]
mod test {

  use std::time::Duration;

  use super::Config;

  #[test]
  pub fn from_str() {
    let config = Config::from_str(
      r#"
      [player]
      pattern = "a [b c]"
      duration = "1m"

      [timing]
      tempo = 60

      [sequence]
      subdivision = "2n"
      "#,
    )
    .unwrap();

    let time_base = config.timing.time_base();
    assert_eq!(config.player.pattern, "a [b c]");
    assert_eq!(
      config.player.duration(&time_base).unwrap(),
      Duration::from_secs(4)
    );
    assert_eq!(
      config.player.tick(&time_base).unwrap(),
      Duration::from_millis(5)
    );
    assert_eq!(config.sequence.subdivision, "2n");
  }

  #[test]
  pub fn invalid_duration() {
    let config = Config::from_str("[player]\nduration = \"forever\"").unwrap();
    let time_base = config.timing.time_base();
    assert!(config.player.duration(&time_base).is_err());
  }
}
