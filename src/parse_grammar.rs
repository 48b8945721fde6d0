/// Simple recursive-descent parsing of grammar text
use regex::Regex;
use std::borrow::Cow;
use std::str::FromStr;

use crate::Err;
use crate::category::Category;
use crate::grammar::Grammar;
use crate::rules::GrammarRule;

/// One alternative of a statement, already classified
#[derive(Debug, Clone, PartialEq)]
enum Alternative {
  Rule(GrammarRule),
  Word(String, Category),
}

/// Parses a grammar from text. The start category is the one named by a
/// leading `start Category;`, or else the first statement's left-hand side.
impl FromStr for Grammar {
  type Err = Err;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (declared, s) = parse_start_declaration(skip_whitespace(s))?;
    let (statements, rest) = parse_statements(s)?;
    if !rest.is_empty() {
      return Err(format!("trailing input at {}", rest).into());
    }

    let start = match (declared, statements.first()) {
      (Some(start), _) => start,
      (None, Some((lhs, _))) => *lhs,
      (None, None) => return Err("empty grammar".into()),
    };

    let mut g = Grammar::new(start);
    for (_, alternatives) in statements {
      for alt in alternatives {
        match alt {
          Alternative::Rule(rule) => g.add_rule(rule),
          Alternative::Word(word, category) => g.add_lexical_entry(&word, category),
        }
      }
    }

    Ok(g)
  }
}

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str), Err>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// Try to consume a regex at the start of `s`, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<&'a str>> {
  match re.find(s) {
    Some(m) if m.start() == 0 => {
      let (_, rest) = s.split_at(m.end());
      (Some(m.as_str()), rest)
    }
    _ => (None, s),
  }
}

/// Try to consume a regex, failing if it doesn't match
fn needed_re<'a>(re: &'static Regex, s: &'a str) -> ParseResult<'a, &'a str> {
  if let (Some(c), rest) = optional_re(re, s) {
    Ok((c, rest))
  } else {
    Err(format!("couldn't match {} at {}", re, excerpt(s)).into())
  }
}

/// Try to consume a char, returning None if it doesn't match
fn optional_char(c: char, s: &str) -> Infallible<'_, Option<char>> {
  match s.strip_prefix(c) {
    Some(rest) => (Some(c), rest),
    None => (None, s),
  }
}

/// Tries to skip whitespace and // comments
fn skip_whitespace(s: &str) -> &str {
  regex_static!(WHITESPACE_OR_COMMENT, r"^(\s|//[^\n]*)*");
  optional_re(&*WHITESPACE_OR_COMMENT, s).1
}

/// Tries to parse a name made of letters, numbers, ' and _
fn parse_name(s: &str) -> ParseResult<'_, &str> {
  regex_static!(NAME, r"^[a-zA-Z0-9'_]+");
  needed_re(&*NAME, s).map_err(|err| format!("name: {}", err).into())
}

/// The first line of `s`, for error messages
fn excerpt(s: &str) -> &str {
  s.lines().next().unwrap_or("")
}

fn is_category_name(name: &str) -> bool {
  name.chars().next().is_some_and(char::is_uppercase)
}

fn parse_category(s: &str) -> ParseResult<'_, Category> {
  let (name, rest) = parse_name(s)?;
  if !is_category_name(name) {
    return Err(format!("expected category, got word {} at {}", name, excerpt(s)).into());
  }
  Ok((name.parse()?, rest))
}

/// Tries to parse a double-quoted word, with `\"` and `\\` escapes
fn parse_quoted(s: &str) -> ParseResult<'_, String> {
  regex_static!(QUOTED, r#"^"(?:[^"\\]|\\.)*""#);
  let (quoted, rest) =
    needed_re(&*QUOTED, s).map_err(|e| -> Err { format!("quoted word: {}", e).into() })?;

  let mut word = String::with_capacity(quoted.len());
  let mut chars = quoted[1..quoted.len() - 1].chars();
  while let Some(c) = chars.next() {
    match c {
      '\\' => word.extend(chars.next()),
      c => word.push(c),
    }
  }
  Ok((word, rest))
}

/// `word` as grammar text: bare if it reads back as a word, quoted otherwise
pub(crate) fn quote_word(word: &str) -> Cow<'_, str> {
  regex_static!(BARE_WORD, r"^[a-z0-9'_]+$");
  if BARE_WORD.is_match(word) {
    return Cow::Borrowed(word);
  }

  let mut quoted = String::with_capacity(word.len() + 2);
  quoted.push('"');
  for c in word.chars() {
    if c == '"' || c == '\\' {
      quoted.push('\\');
    }
    quoted.push(c);
  }
  quoted.push('"');
  Cow::Owned(quoted)
}

/// One name of an alternative, as written
#[derive(Debug)]
enum Item<'a> {
  Bare(&'a str),
  Quoted(String),
}

impl Item<'_> {
  fn is_word(&self) -> bool {
    match self {
      Self::Bare(name) => !is_category_name(name),
      Self::Quoted(_) => true,
    }
  }

  fn text(&self) -> &str {
    match self {
      Self::Bare(name) => *name,
      Self::Quoted(word) => word.as_str(),
    }
  }
}

fn parse_item(s: &str) -> ParseResult<'_, Item<'_>> {
  if s.starts_with('"') {
    let (word, rest) = parse_quoted(s)?;
    Ok((Item::Quoted(word), rest))
  } else {
    let (name, rest) = parse_name(s)?;
    Ok((Item::Bare(name), rest))
  }
}

/// Names up to the next `|` or `;`, classified into a rule or a lexical entry
fn parse_alternative(lhs: Category, s: &str) -> ParseResult<'_, Alternative> {
  let mut items = Vec::new();
  let mut rem = skip_whitespace(s);
  while !rem.is_empty() && !rem.starts_with('|') && !rem.starts_with(';') {
    let (item, rest) = parse_item(rem)?;
    items.push(item);
    rem = skip_whitespace(rest);
  }

  let joined = || items.iter().map(Item::text).collect::<Vec<_>>().join(" ");
  let words = items.iter().filter(|i| i.is_word()).count();
  if words == 0 {
    let rhs = items
      .iter()
      .map(|i| i.text().parse::<Category>())
      .collect::<Result<Vec<Category>, _>>()?;
    Ok((Alternative::Rule(GrammarRule::new(lhs, rhs)), rem))
  } else if words < items.len() {
    Err(format!("words cannot be mixed with categories: {} -> {}", lhs, joined()).into())
  } else if items.len() > 1 {
    Err(format!("lexical entry must be a single word: {} -> {}", lhs, joined()).into())
  } else {
    Ok((Alternative::Word(items[0].text().to_string(), lhs), rem))
  }
}

/// An optional `start Category;`, for a start category that heads no rule
fn parse_start_declaration(s: &str) -> ParseResult<'_, Option<Category>> {
  regex_static!(START, r"^start\s+");

  let (Some(_), s) = optional_re(&*START, s) else {
    return Ok((None, s));
  };
  let (start, s) =
    parse_category(s).map_err(|e| -> Err { format!("start declaration: {}", e).into() })?;
  match optional_char(';', skip_whitespace(s)) {
    (Some(_), s) => Ok((Some(start), s)),
    (None, _) => Err(format!("start declaration for {} is missing its terminating ;", start).into()),
  }
}

/// Category, arrow, alternatives separated by `|`, terminated by `;`
fn parse_statement(s: &str) -> ParseResult<'_, (Category, Vec<Alternative>)> {
  #![allow(clippy::trivial_regex)]
  regex_static!(ARROW, "^->");

  let (lhs, s) =
    parse_category(s).map_err(|e| -> Err { format!("statement head: {}", e).into() })?;
  let s = skip_whitespace(s);
  let (_, s) = needed_re(&*ARROW, s).map_err(|e| -> Err { format!("statement arrow: {}", e).into() })?;

  let mut alternatives = Vec::new();
  let mut rem = s;
  loop {
    let (alt, s) = parse_alternative(lhs, rem)?;
    alternatives.push(alt);
    if let (Some(_), s) = optional_char('|', s) {
      rem = s;
    } else if let (Some(_), s) = optional_char(';', s) {
      rem = s;
      break;
    } else {
      return Err(format!("statement for {} is missing its terminating ;", lhs).into());
    }
  }

  Ok(((lhs, alternatives), rem))
}

fn parse_statements(s: &str) -> ParseResult<'_, Vec<(Category, Vec<Alternative>)>> {
  let mut statements = Vec::new();
  let mut rem = skip_whitespace(s);
  while !rem.is_empty() {
    let (statement, s) = parse_statement(rem)?;
    statements.push(statement);
    rem = skip_whitespace(s);
  }
  Ok((statements, rem))
}
