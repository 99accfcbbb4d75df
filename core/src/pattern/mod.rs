pub mod compiler;
pub mod parser;
pub mod tracker;

use failure::Fail;

pub use self::compiler::{flatten, ScheduleEntry};
pub use self::parser::parse;
pub use self::tracker::{Edit, TrackedPattern};

pub type Path = Vec<usize>;

#[derive(Debug, Fail, PartialEq)]
pub enum PatternError {
  #[fail(display = "Empty group at {:?}", path)]
  EmptyGroup { path: Path },

  #[fail(display = "No step or group at {:?}", path)]
  InvalidPath { path: Path },

  #[fail(display = "Failed to parse pattern at {}: {}", position, cause)]
  Parse { position: usize, cause: String },
}

/// What a slot plays: a sound carrying the caller's payload, or nothing at all
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
  Sound(T),
  Silence,
}

impl<T> Step<T> {
  pub fn is_silence(&self) -> bool {
    match self {
      Step::Silence => true,
      Step::Sound(_) => false,
    }
  }

  pub fn sound(&self) -> Option<&T> {
    match self {
      Step::Sound(value) => Some(value),
      Step::Silence => None,
    }
  }
}

/// A slot holding one step, or a group that splits the slot evenly between its children
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern<T> {
  Leaf(Step<T>),
  Group(Vec<Pattern<T>>),
}

impl<T> Pattern<T> {
  pub fn sound(value: T) -> Pattern<T> {
    Pattern::Leaf(Step::Sound(value))
  }

  pub fn silence() -> Pattern<T> {
    Pattern::Leaf(Step::Silence)
  }

  pub fn group<I>(children: I) -> Pattern<T>
  where
    I: IntoIterator<Item = Pattern<T>>,
  {
    Pattern::Group(children.into_iter().collect())
  }

  /// A group with one sound per value
  pub fn sounds<I>(values: I) -> Pattern<T>
  where
    I: IntoIterator<Item = T>,
  {
    Pattern::Group(values.into_iter().map(Pattern::sound).collect())
  }

  pub fn is_group(&self) -> bool {
    match self {
      Pattern::Group(_) => true,
      Pattern::Leaf(_) => false,
    }
  }

  pub fn children(&self) -> Option<&[Pattern<T>]> {
    match self {
      Pattern::Group(children) => Some(children.as_slice()),
      Pattern::Leaf(_) => None,
    }
  }

  /// Number of steps reachable from this node
  pub fn leaf_count(&self) -> usize {
    match self {
      Pattern::Leaf(_) => 1,
      Pattern::Group(children) => children.iter().map(Pattern::leaf_count).sum(),
    }
  }
}

impl<T> From<Step<T>> for Pattern<T> {
  fn from(step: Step<T>) -> Self {
    Pattern::Leaf(step)
  }
}

impl<T> From<Vec<Pattern<T>>> for Pattern<T> {
  fn from(children: Vec<Pattern<T>>) -> Self {
    Pattern::Group(children)
  }
}
