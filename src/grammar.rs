use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::category::Category;
use crate::earley::{Chart, parse_chart};
use crate::forest::Forest;
use crate::lexicon::Lexicon;
use crate::parse_grammar::quote_word;
use crate::rules::GrammarRule;
use crate::syntree::ParseTree;

/// Splits a sentence on whitespace and lowercases every token.
pub fn tokenize(sentence: &str) -> Vec<String> {
  sentence
    .split_whitespace()
    .map(str::to_ascii_lowercase)
    .collect()
}

/// Production rules plus the lexicon they bottom out in.
///
/// Is `Send + Sync`, so one grammar can serve parses on many threads. Mutation
/// takes `&mut self` and must be synchronized by the caller.
#[derive(Debug, Clone)]
pub struct Grammar {
  start: Category,
  rules: Vec<Arc<GrammarRule>>,
  by_lhs: HashMap<Category, Vec<Arc<GrammarRule>>>,
  lexicon: Lexicon,
  nullables: HashSet<Category>,
}

impl Grammar {
  pub fn new(start: Category) -> Self {
    Self {
      start,
      rules: Vec::new(),
      by_lhs: HashMap::new(),
      lexicon: Lexicon::new(),
      nullables: HashSet::new(),
    }
  }

  pub fn with_start(mut self, start: Category) -> Self {
    self.start = start;
    self
  }

  pub fn start(&self) -> Category {
    self.start
  }

  pub fn rules(&self) -> &[Arc<GrammarRule>] {
    &self.rules
  }

  pub fn rules_for(&self, lhs: Category) -> &[Arc<GrammarRule>] {
    self.by_lhs.get(&lhs).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn lexicon(&self) -> &Lexicon {
    &self.lexicon
  }

  /// Adds a production. Adding a rule that is already present does nothing.
  pub fn add_rule(&mut self, rule: GrammarRule) {
    if self.rules.iter().any(|r| **r == rule) {
      return;
    }
    let rule = Arc::new(rule);
    self.by_lhs.entry(rule.lhs).or_default().push(rule.clone());
    self.rules.push(rule);
    self.nullables = Self::find_nullables(&self.rules, &self.lexicon);
  }

  /// Binds `word` to `category`, which makes `category` terminal.
  pub fn add_lexical_entry(&mut self, word: &str, category: Category) {
    let newly_terminal = !self.lexicon.has_category(category);
    self.lexicon.insert(word, category);
    if newly_terminal {
      self.nullables = Self::find_nullables(&self.rules, &self.lexicon);
    }
  }

  /// Removes every rule headed by `lhs`, returning how many were removed.
  pub fn remove_rules(&mut self, lhs: Category) -> usize {
    let before = self.rules.len();
    self.rules.retain(|r| r.lhs != lhs);
    self.by_lhs.remove(&lhs);
    self.nullables = Self::find_nullables(&self.rules, &self.lexicon);
    before - self.rules.len()
  }

  /// A category is terminal iff the lexicon binds some word to it. Terminal
  /// categories are scanned from the input and never predicted, even if rules
  /// are headed by them.
  pub fn is_terminal(&self, category: Category) -> bool {
    self.lexicon.has_category(category)
  }

  pub fn is_nullable(&self, category: Category) -> bool {
    self.nullables.contains(&category)
  }

  fn rule_is_nullable(nullables: &HashSet<Category>, rule: &GrammarRule) -> bool {
    rule.rhs.iter().all(|c| nullables.contains(c))
  }

  /// Categories that can derive empty input. Terminal categories are never
  /// predicted, so their rules can't produce a zero-width completion and a
  /// terminal is never nullable.
  fn find_nullables(rules: &[Arc<GrammarRule>], lexicon: &Lexicon) -> HashSet<Category> {
    let mut nullables = HashSet::new();

    let mut last_length = 1;
    while last_length != nullables.len() {
      last_length = nullables.len();
      for r in rules.iter().filter(|r| !lexicon.has_category(r.lhs)) {
        if !nullables.contains(&r.lhs) && Self::rule_is_nullable(&nullables, r) {
          nullables.insert(r.lhs);
        }
      }
    }

    nullables
  }

  pub fn parse_chart(&self, tokens: &[String]) -> Chart {
    parse_chart(self, tokens)
  }

  pub fn parse_forest(&self, tokens: &[String]) -> Forest {
    Forest::from(self.parse_chart(tokens))
  }

  /// Every derivation of `sentence` from the start category. Unparsable input
  /// gives an empty vec.
  pub fn parse(&self, sentence: &str) -> Vec<ParseTree> {
    let tokens = tokenize(sentence);
    let trees = self.parse_forest(&tokens).trees(self.start);
    tracing::debug!(tokens = tokens.len(), trees = trees.len(), "parsed sentence");
    trees
  }

  /// Whether `sentence` is in the language, without building trees.
  pub fn recognize(&self, sentence: &str) -> bool {
    let tokens = tokenize(sentence);
    self.parse_chart(&tokens).accepts(self.start)
  }
}

impl Default for Grammar {
  fn default() -> Self {
    Self::new(Category::Sentence)
  }
}

/// Writes the grammar in the notation `parse_grammar` reads. Start rules come
/// first, or a `start` declaration if the start category heads no rule.
impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.rules_for(self.start).is_empty() {
      writeln!(f, "start {};", self.start)?;
    }

    let mut heads = vec![self.start];
    for r in self.rules.iter() {
      if !heads.contains(&r.lhs) {
        heads.push(r.lhs);
      }
    }

    for lhs in heads {
      let rules = self.rules_for(lhs);
      if rules.is_empty() {
        continue;
      }
      write!(f, "{} ->", lhs)?;
      for (idx, rule) in rules.iter().enumerate() {
        if idx > 0 {
          write!(f, " |")?;
        }
        for c in rule.rhs.iter() {
          write!(f, " {}", c)?;
        }
      }
      writeln!(f, ";")?;
    }

    let mut by_category: Vec<(Category, Vec<&str>)> = Vec::new();
    for t in self.lexicon.terminals() {
      match by_category.iter().position(|(c, _)| *c == t.category) {
        Some(idx) => by_category[idx].1.push(t.word.as_str()),
        None => by_category.push((t.category, vec![t.word.as_str()])),
      }
    }
    for (category, words) in by_category {
      let words = words.into_iter().map(quote_word).collect::<Vec<_>>();
      writeln!(f, "{} -> {};", category, words.join(" | "))?;
    }

    Ok(())
  }
}
