use std::iter::Peekable;
use std::str::CharIndices;

use super::{Pattern, PatternError};

/// Parse mini-notation like `"C4 [E4 D4] G4 ~"`, where `~` and `_` are silent slots
pub fn parse(notation: &str) -> Result<Vec<Pattern<String>>, PatternError> {
  let mut chars = notation.char_indices().peekable();
  let root = parse_group(&mut chars, None)?;
  Ok(root)
}

fn parse_group(
  chars: &mut Peekable<CharIndices>,
  opened_at: Option<usize>,
) -> Result<Vec<Pattern<String>>, PatternError> {
  let mut children = Vec::new();

  while let Some(&(position, c)) = chars.peek() {
    match c {
      '[' => {
        chars.next();
        let group = parse_group(chars, Some(position))?;
        if group.is_empty() {
          return Err(PatternError::Parse {
            position,
            cause: "empty group".to_string(),
          });
        }
        children.push(Pattern::Group(group));
      }
      ']' => {
        chars.next();
        return match opened_at {
          Some(_) => Ok(children),
          None => Err(PatternError::Parse {
            position,
            cause: "unexpected ']'".to_string(),
          }),
        };
      }
      c if c.is_whitespace() => {
        chars.next();
      }
      // anything else is a token up to the next space or bracket
      _ => children.push(parse_token(chars)),
    }
  }

  match opened_at {
    Some(position) => Err(PatternError::Parse {
      position,
      cause: "unclosed '['".to_string(),
    }),
    None => Ok(children),
  }
}

fn parse_token(chars: &mut Peekable<CharIndices>) -> Pattern<String> {
  let mut token = String::new();
  while let Some(&(_, c)) = chars.peek() {
    if c.is_whitespace() || c == '[' || c == ']' {
      break;
    }
    token.push(c);
    chars.next();
  }

  match token.as_str() {
    "~" | "_" => Pattern::silence(),
    _ => Pattern::sound(token),
  }
}
