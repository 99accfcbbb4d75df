pub const DEFAULT_TEMPO: u16 = 120;

/// Beats per minute
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Tempo(u16);

impl Tempo {
  pub fn new(value: u16) -> Tempo {
    Tempo(value.max(1))
  }

  pub fn get_value(&self) -> u16 {
    self.0
  }
}

impl Default for Tempo {
  fn default() -> Tempo {
    Tempo(DEFAULT_TEMPO)
  }
}

impl From<Tempo> for u64 {
  fn from(item: Tempo) -> Self {
    u64::from(item.0)
  }
}

#[cfg(test)]
mod test {

  use super::Tempo;

  #[test]
  pub fn tempo_new() {
    let tempo = Tempo::new(120);
    assert_eq!(tempo.get_value(), 120);
  }

  #[test]
  pub fn tempo_is_never_zero() {
    assert_eq!(Tempo::new(0).get_value(), 1);
  }
}
