use crate::time::TicksTime;

use super::{Path, Pattern, PatternError, Step};

/// A step placed at an absolute offset
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry<T> {
  pub offset: TicksTime,
  pub step: Step<T>,
}

impl<T> ScheduleEntry<T> {
  pub fn new(offset: TicksTime, step: Step<T>) -> ScheduleEntry<T> {
    ScheduleEntry { offset, step }
  }
}

/// Lay out every step of the root group, one `subdivision` per root slot, starting at `offset`.
///
/// Nested groups split their slot evenly between their children. The split is integer tick
/// division, so a slot that the group length does not divide is rounded down. Note value
/// subdivisions such as `4n` or `16n` divide evenly for groups of up to 10 children.
/// Offsets saturate at the end of time instead of overflowing.
///
/// An empty root yields no entries, an empty nested group is rejected. Entries come out in
/// slot order.
pub fn flatten<T: Clone>(
  root: &[Pattern<T>],
  subdivision: TicksTime,
  offset: TicksTime,
) -> Result<Vec<ScheduleEntry<T>>, PatternError> {
  let mut entries = Vec::with_capacity(root.iter().map(Pattern::leaf_count).sum());
  let mut path = Path::new();
  flatten_group(root, subdivision, offset, &mut path, &mut entries)?;
  Ok(entries)
}

fn flatten_group<T: Clone>(
  children: &[Pattern<T>],
  slot: TicksTime,
  offset: TicksTime,
  path: &mut Path,
  entries: &mut Vec<ScheduleEntry<T>>,
) -> Result<(), PatternError> {
  for (index, child) in children.iter().enumerate() {
    let child_offset = offset + slot * index;
    path.push(index);
    match child {
      Pattern::Leaf(step) => entries.push(ScheduleEntry::new(child_offset, step.clone())),
      Pattern::Group(grandchildren) => {
        let child_slot = slot
          .checked_div(grandchildren.len())
          .ok_or_else(|| PatternError::EmptyGroup { path: path.clone() })?;
        flatten_group(grandchildren, child_slot, child_offset, path, entries)?;
      }
    }
    path.pop();
  }
  Ok(())
}
