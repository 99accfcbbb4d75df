use failure::Error;

use serde_derive::Deserialize;

use std::fs::File;
use std::io::Read;

use crate::time::{ClockTime, FixedTempo, Notation, NotationError, Signature, Tempo, TimeBase};
use crate::timeline::{Humanize, LoopMode};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Timing {
  pub tempo: u16,
  pub num_beats: u8,
  pub note_value: u8,
}

impl Default for Timing {
  fn default() -> Timing {
    let signature = Signature::default();
    Timing {
      tempo: Tempo::default().get_value(),
      num_beats: signature.get_num_beats(),
      note_value: signature.get_note_value(),
    }
  }
}

impl Timing {
  pub fn time_base(&self) -> FixedTempo {
    let note_value = self.note_value.max(1).min(16);
    FixedTempo::new(
      Signature::new(self.num_beats, note_value),
      Tempo::new(self.tempo),
    )
  }
}

/// `loop = true` or `loop = 4`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(untagged)]
pub enum LoopSetting {
  Enabled(bool),
  Count(u32),
}

impl From<LoopSetting> for LoopMode {
  fn from(setting: LoopSetting) -> Self {
    match setting {
      LoopSetting::Enabled(enabled) => LoopMode::from(enabled),
      LoopSetting::Count(count) => LoopMode::Count(count),
    }
  }
}

/// `humanize = true` or `humanize = "32n"`
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum HumanizeSetting {
  Enabled(bool),
  Amount(String),
}

impl HumanizeSetting {
  pub fn resolve(&self, time_base: &dyn TimeBase) -> Result<Humanize, NotationError> {
    match self {
      HumanizeSetting::Enabled(enabled) => Ok(Humanize::from(*enabled)),
      HumanizeSetting::Amount(notation) => {
        let amount: ClockTime = notation.parse::<Notation>()?.to_clock(time_base);
        Ok(Humanize::Amount(amount))
      }
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SequenceConfig {
  pub subdivision: String,
  #[serde(rename = "loop")]
  pub looping: LoopSetting,
  pub loop_start: usize,
  pub loop_end: usize,
  pub playback_rate: f64,
  pub probability: f64,
  pub humanize: HumanizeSetting,
  pub mute: bool,
}

impl Default for SequenceConfig {
  fn default() -> SequenceConfig {
    SequenceConfig {
      subdivision: "8n".to_string(),
      looping: LoopSetting::Enabled(true),
      loop_start: 0,
      loop_end: 0,
      playback_rate: 1.0,
      probability: 1.0,
      humanize: HumanizeSetting::Enabled(false),
      mute: false,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
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

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}

#[cfg(test)]
mod test {

  use super::{Config, HumanizeSetting, LoopSetting};
  use crate::time::{ClockTime, TimeBase};
  use crate::timeline::{Humanize, LoopMode};

  #[test]
  pub fn defaults() {
    let config = Config::from_str("").unwrap();
    assert_eq!(config.timing.tempo, 120);
    assert_eq!(config.sequence.subdivision, "8n");
    assert_eq!(config.sequence.looping, LoopSetting::Enabled(true));
    assert_eq!(config.sequence.loop_end, 0);
    assert_eq!(config.sequence.playback_rate, 1.0);
    assert_eq!(config.sequence.humanize, HumanizeSetting::Enabled(false));
  }

  #[test]
  pub fn from_str() {
    let config = Config::from_str(
      r#"
      [timing]
      tempo = 90
      num_beats = 3

      [sequence]
      subdivision = "16n"
      loop = 4
      loop_start = 1
      humanize = "32n"
      probability = 0.5
      "#,
    )
    .unwrap();

    assert_eq!(config.timing.tempo, 90);
    assert_eq!(config.timing.time_base().get_signature().get_num_beats(), 3);
    assert_eq!(config.sequence.subdivision, "16n");
    assert_eq!(LoopMode::from(config.sequence.looping), LoopMode::Count(4));
    assert_eq!(config.sequence.loop_start, 1);
    assert_eq!(config.sequence.probability, 0.5);
    assert_eq!(
      config.sequence.humanize,
      HumanizeSetting::Amount("32n".to_string())
    );
  }

  #[test]
  pub fn humanize_resolve() {
    let time_base = Config::default().timing.time_base();
    assert_eq!(
      HumanizeSetting::Enabled(true).resolve(&time_base),
      Ok(Humanize::Default)
    );
    assert_eq!(
      HumanizeSetting::Amount("0.01".to_string()).resolve(&time_base),
      Ok(Humanize::Amount(ClockTime::from_millis(10)))
    );
    assert!(HumanizeSetting::Amount("soon".to_string())
      .resolve(&time_base)
      .is_err());
  }

  #[test]
  pub fn invalid_toml() {
    assert!(Config::from_str("[sequence]\nloop = \"sometimes\"").is_err());
  }
}
