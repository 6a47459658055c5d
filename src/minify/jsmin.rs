//! Conservative JavaScript minification.
//!
//! The filter removes comments and collapses whitespace runs while leaving
//! every token intact. String, template, and regex literals are tracked so
//! their contents are never rewritten; whitespace runs containing a newline
//! collapse to a single newline so automatic semicolon insertion keeps its
//! meaning.

use super::MinifyFilter;

/// Whitespace- and comment-stripping JavaScript filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsMinFilter;

impl MinifyFilter for JsMinFilter {
  fn name(&self) -> &str {
    "jsmin"
  }

  fn apply(&self, source: &str) -> String {
    strip(source)
  }
}

enum State {
  Code,
  Str(char),
  LineComment,
  BlockComment { saw_newline: bool },
  Regex,
  RegexClass,
}

fn strip(source: &str) -> String {
  let mut out = String::with_capacity(source.len());
  let mut state = State::Code;
  let mut chars = source.chars().peekable();
  let mut last_code: Option<char> = None;
  let mut escaped = false;
  let mut pending_ws = false;
  let mut pending_newline = false;

  while let Some(c) = chars.next() {
    match state {
      State::Code => {
        if c.is_whitespace() {
          pending_ws = true;
          if c == '\n' {
            pending_newline = true;
          }
          continue;
        }
        if c == '/' {
          match chars.peek() {
            Some('/') => {
              chars.next();
              state = State::LineComment;
              continue;
            }
            Some('*') => {
              chars.next();
              state = State::BlockComment { saw_newline: false };
              continue;
            }
            _ => {}
          }
        }
        if pending_ws {
          if !out.is_empty() {
            out.push(if pending_newline { '\n' } else { ' ' });
          }
          pending_ws = false;
          pending_newline = false;
        }
        match c {
          '"' | '\'' | '`' => {
            state = State::Str(c);
            escaped = false;
          }
          '/' if regex_may_follow(last_code) => {
            state = State::Regex;
            escaped = false;
          }
          _ => {}
        }
        out.push(c);
        last_code = Some(c);
      }
      State::Str(quote) => {
        out.push(c);
        if escaped {
          escaped = false;
        } else if c == '\\' {
          escaped = true;
        } else if c == quote {
          state = State::Code;
          last_code = Some(c);
        }
      }
      State::LineComment => {
        if c == '\n' {
          pending_ws = true;
          pending_newline = true;
          state = State::Code;
        }
      }
      State::BlockComment { saw_newline } => {
        if c == '\n' {
          state = State::BlockComment { saw_newline: true };
        } else if c == '*' && chars.peek() == Some(&'/') {
          chars.next();
          pending_ws = true;
          pending_newline |= saw_newline;
          state = State::Code;
        }
      }
      State::Regex => {
        if c == '\n' {
          // Not a regex literal after all; fall back to plain code.
          pending_ws = true;
          pending_newline = true;
          state = State::Code;
          continue;
        }
        out.push(c);
        if escaped {
          escaped = false;
        } else if c == '\\' {
          escaped = true;
        } else if c == '[' {
          state = State::RegexClass;
        } else if c == '/' {
          state = State::Code;
          last_code = Some(c);
        }
      }
      State::RegexClass => {
        out.push(c);
        if escaped {
          escaped = false;
        } else if c == '\\' {
          escaped = true;
        } else if c == ']' {
          state = State::Regex;
        }
      }
    }
  }

  out
}

/// A `/` after these characters opens a regex literal rather than division.
fn regex_may_follow(last: Option<char>) -> bool {
  match last {
    None => true,
    Some(c) => matches!(
      c,
      '(' | ',' | '=' | ':' | '[' | '!' | '&' | '|' | '?' | '{' | '}' | ';' | '+' | '-' | '*'
        | '%' | '~' | '^' | '<' | '>'
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn minify(source: &str) -> String {
    JsMinFilter.apply(source)
  }

  #[test]
  fn strips_line_comments() {
    assert_eq!(minify("x = 1; // note\ny = 2;"), "x = 1;\ny = 2;");
  }

  #[test]
  fn strips_block_comments() {
    assert_eq!(minify("a /* gone */ b"), "a b");
    assert_eq!(minify("a /* line\nbreak */ b"), "a\nb");
  }

  #[test]
  fn collapses_whitespace_runs() {
    assert_eq!(minify("let   x\t=   1;"), "let x = 1;");
    assert_eq!(minify("a;\n\n\nb;"), "a;\nb;");
  }

  #[test]
  fn trims_leading_and_trailing_whitespace() {
    assert_eq!(minify("  x=1  \n"), "x=1");
  }

  #[test]
  fn preserves_string_contents() {
    assert_eq!(minify("s = \"a  //  b\";"), "s = \"a  //  b\";");
    assert_eq!(minify("s = 'it\\'s';"), "s = 'it\\'s';");
  }

  #[test]
  fn preserves_template_literals_across_lines() {
    assert_eq!(minify("t = `one\n  two`;"), "t = `one\n  two`;");
  }

  #[test]
  fn preserves_regex_literals() {
    assert_eq!(minify("p = /https?:\\/\\//; q = 1;"), "p = /https?:\\/\\//; q = 1;");
    assert_eq!(minify("p = /[/]/;"), "p = /[/]/;");
  }

  #[test]
  fn division_is_not_a_regex() {
    assert_eq!(minify("x = a / b / c;"), "x = a / b / c;");
  }

  #[test]
  fn is_deterministic() {
    let source = "function f() {\n  // comment\n  return 1;\n}";
    assert_eq!(minify(source), minify(source));
    assert_eq!(minify(source), "function f() {\nreturn 1;\n}");
  }
}
