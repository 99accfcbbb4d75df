use super::{Path, Pattern, PatternError};

/// An accepted write, with what is needed to undo it
#[derive(Debug, Clone, PartialEq)]
pub enum Edit<T> {
  Set { path: Path, previous: Pattern<T> },
  Insert { path: Path },
  Remove { path: Path, removed: Pattern<T> },
  Replace { previous: Vec<Pattern<T>> },
}

/// Root group of a pattern whose writes are observed.
///
/// Every write goes through an index path from the root, and every accepted write bumps the
/// revision exactly once. The owner rebuilds its schedule whenever the revision moves.
#[derive(Debug, Clone)]
pub struct TrackedPattern<T> {
  root: Vec<Pattern<T>>,
  revision: u64,
}

impl<T> TrackedPattern<T> {
  pub fn new(root: Vec<Pattern<T>>) -> TrackedPattern<T> {
    TrackedPattern { root, revision: 0 }
  }

  pub fn root(&self) -> &[Pattern<T>] {
    self.root.as_slice()
  }

  pub fn len(&self) -> usize {
    self.root.len()
  }

  pub fn is_empty(&self) -> bool {
    self.root.is_empty()
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  pub fn get(&self, path: &[usize]) -> Option<&Pattern<T>> {
    let (last, parents) = path.split_last()?;
    let mut children = self.root.as_slice();
    for index in parents {
      children = children.get(*index)?.children()?;
    }
    children.get(*last)
  }

  pub fn replace(&mut self, root: Vec<Pattern<T>>) -> Edit<T> {
    let previous = std::mem::replace(&mut self.root, root);
    self.revision += 1;
    Edit::Replace { previous }
  }

  /// Write `value` at `path`, replacing the step or group found there
  pub fn set_at<P>(&mut self, path: &[usize], value: P) -> Result<Edit<T>, PatternError>
  where
    P: Into<Pattern<T>>,
  {
    let (index, group) = self.parent_group_mut(path)?;
    let slot = group
      .get_mut(index)
      .ok_or_else(|| PatternError::InvalidPath {
        path: path.to_vec(),
      })?;
    let previous = std::mem::replace(slot, value.into());
    self.revision += 1;
    Ok(Edit::Set {
      path: path.to_vec(),
      previous,
    })
  }

  /// Insert `value` before the last index of `path`, which may be the group length to append
  pub fn insert_at<P>(&mut self, path: &[usize], value: P) -> Result<Edit<T>, PatternError>
  where
    P: Into<Pattern<T>>,
  {
    let (index, group) = self.parent_group_mut(path)?;
    if index > group.len() {
      return Err(PatternError::InvalidPath {
        path: path.to_vec(),
      });
    }
    group.insert(index, value.into());
    self.revision += 1;
    Ok(Edit::Insert {
      path: path.to_vec(),
    })
  }

  pub fn remove_at(&mut self, path: &[usize]) -> Result<Edit<T>, PatternError> {
    let (index, group) = self.parent_group_mut(path)?;
    if index >= group.len() {
      return Err(PatternError::InvalidPath {
        path: path.to_vec(),
      });
    }
    let removed = group.remove(index);
    self.revision += 1;
    Ok(Edit::Remove {
      path: path.to_vec(),
      removed,
    })
  }

  /// Undo an edit returned by this pattern, restoring the revision it replaced
  pub fn revert(&mut self, edit: Edit<T>) -> Result<(), PatternError> {
    match edit {
      Edit::Set { path, previous } => {
        self.set_at(&path, previous)?;
      }
      Edit::Insert { path } => {
        self.remove_at(&path)?;
      }
      Edit::Remove { path, removed } => {
        self.insert_at(&path, removed)?;
      }
      Edit::Replace { previous } => {
        self.replace(previous);
      }
    }
    self.revision -= 2;
    Ok(())
  }

  fn parent_group_mut(
    &mut self,
    path: &[usize],
  ) -> Result<(usize, &mut Vec<Pattern<T>>), PatternError> {
    let invalid = || PatternError::InvalidPath {
      path: path.to_vec(),
    };
    let (last, parents) = path.split_last().ok_or_else(invalid)?;
    let mut group = &mut self.root;
    for index in parents {
      group = match group.get_mut(*index) {
        Some(Pattern::Group(children)) => children,
        _ => return Err(invalid()),
      };
    }
    Ok((*last, group))
  }
}

#[cfg(test)]
mod test {

  use super::{Edit, TrackedPattern};
  use crate::pattern::{Pattern, PatternError};

  fn abc() -> TrackedPattern<char> {
    TrackedPattern::new(vec![
      Pattern::sound('A'),
      Pattern::sound('B'),
      Pattern::sound('C'),
    ])
  }

  #[test]
  pub fn set_leaf() {
    let mut pattern = abc();
    let edit = pattern.set_at(&[1], Pattern::<char>::silence()).unwrap();
    assert_eq!(pattern.get(&[1]), Some(&Pattern::silence()));
    assert_eq!(pattern.revision(), 1);
    assert_eq!(
      edit,
      Edit::Set {
        path: vec![1],
        previous: Pattern::sound('B')
      }
    );
  }

  #[test]
  pub fn set_nested_sequence_is_tracked_as_group() {
    let mut pattern = abc();
    pattern
      .set_at(&[1], vec![Pattern::sound('X'), Pattern::sound('Y')])
      .unwrap();
    assert!(pattern.get(&[1]).map(Pattern::is_group).unwrap_or(false));

    pattern.set_at(&[1, 0], Pattern::sound('Z')).unwrap();
    assert_eq!(pattern.get(&[1, 0]), Some(&Pattern::sound('Z')));
    assert_eq!(pattern.revision(), 2);
  }

  #[test]
  pub fn every_write_is_one_revision() {
    let mut pattern = abc();
    pattern.insert_at(&[3], Pattern::sound('D')).unwrap();
    pattern.remove_at(&[0]).unwrap();
    pattern.replace(vec![Pattern::sound('E')]);
    assert_eq!(pattern.revision(), 3);
    assert_eq!(pattern.root(), &[Pattern::sound('E')]);
  }

  #[test]
  pub fn invalid_paths() {
    let mut pattern = abc();
    let invalid = |path: &[usize]| {
      Err(PatternError::InvalidPath {
        path: path.to_vec(),
      })
    };
    assert_eq!(pattern.set_at(&[], Pattern::<char>::silence()), invalid(&[]));
    assert_eq!(pattern.set_at(&[3], Pattern::<char>::silence()), invalid(&[3]));
    assert_eq!(pattern.set_at(&[0, 0], Pattern::<char>::silence()), invalid(&[0, 0]));
    assert_eq!(pattern.insert_at(&[4], Pattern::<char>::silence()), invalid(&[4]));
    assert_eq!(pattern.remove_at(&[3]), invalid(&[3]));
    assert_eq!(pattern.revision(), 0);
  }

  #[test]
  pub fn get() {
    let mut pattern = abc();
    pattern.set_at(&[2], Pattern::sounds(vec!['X', 'Y'])).unwrap();
    assert_eq!(pattern.get(&[2, 1]), Some(&Pattern::sound('Y')));
    assert_eq!(pattern.get(&[0, 1]), None);
    assert_eq!(pattern.get(&[]), None);
  }

  #[test]
  pub fn revert_restores_content_and_revision() {
    let mut pattern = abc();
    let original = pattern.root().to_vec();

    let edit = pattern.set_at(&[0], Pattern::<char>::group(vec![])).unwrap();
    pattern.revert(edit).unwrap();
    assert_eq!(pattern.root(), original.as_slice());

    let edit = pattern.insert_at(&[1], Pattern::<char>::silence()).unwrap();
    pattern.revert(edit).unwrap();
    let edit = pattern.remove_at(&[2]).unwrap();
    pattern.revert(edit).unwrap();
    let edit = pattern.replace(vec![]);
    pattern.revert(edit).unwrap();

    assert_eq!(pattern.root(), original.as_slice());
    assert_eq!(pattern.revision(), 0);
  }
}
