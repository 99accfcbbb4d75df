use log::{debug, info};

use failure::{Error, Fail};

use hero_sequencer_core::time::ClockTime;

mod config;
use crate::config::Config;

mod player;
use crate::player::Player;

const HERO_SEQUENCER_CONFIG: &'static str = "HERO_SEQUENCER_CONFIG";
const DEFAULT_HERO_SEQUENCER_CONFIG: &'static str = "player.toml";

const HERO_SEQUENCER_LOG_CONFIG: &'static str = "HERO_SEQUENCER_LOG_CONFIG";
const DEFAULT_HERO_SEQUENCER_LOG_CONFIG: &'static str = "log4rs.yaml";

#[derive(Debug, Fail)]
enum MainError {
  #[fail(display = "Failed to init logging: {}", cause)]
  LoggingInit { cause: String },
}

fn main() -> Result<(), Error> {
  init_logging()?;

  let config = init_config()?;

  let mut player = init_player(&config)?;

  player.run()?;

  Ok(())
}

fn init_logging() -> Result<(), Error> {
  let log_config_path = std::env::var(HERO_SEQUENCER_LOG_CONFIG)
    .unwrap_or_else(|_| DEFAULT_HERO_SEQUENCER_LOG_CONFIG.to_string());

  log4rs::init_file(log_config_path.as_str(), Default::default()).map_err(|err| {
    MainError::LoggingInit {
      cause: err.to_string(),
    }
  })?;

  Ok(())
}

fn init_config() -> Result<Config, Error> {
  let config_path = std::env::var(HERO_SEQUENCER_CONFIG)
    .unwrap_or_else(|_| DEFAULT_HERO_SEQUENCER_CONFIG.to_string());

  info!("Loading player configuration from {} ...", config_path);
  let config = Config::from_file(config_path.as_str())?;
  debug!("{:#?}", config);

  Ok(config)
}

fn init_player(config: &Config) -> Result<Player, Error> {
  info!("Initialising the player ...");

  Player::new(config, |time: ClockTime, note: &String| {
    info!("{} {}", time, note);
  })
}
