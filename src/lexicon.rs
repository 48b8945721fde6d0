use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::category::Category;

/// A word bound to the category it can be scanned as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Terminal {
  pub word: String,
  pub category: Category,
}

impl Terminal {
  pub fn new(word: impl Into<String>, category: Category) -> Self {
    Self {
      word: word.into(),
      category,
    }
  }
}

impl fmt::Display for Terminal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.word, self.category)
  }
}

/// Maps lowercase surface words to every terminal binding they have.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
  entries: HashMap<String, Vec<Terminal>>,
  // first-insertion order of words, so dumps are stable
  order: Vec<String>,
  categories: HashSet<Category>,
}

impl Lexicon {
  pub fn new() -> Self {
    Self::default()
  }

  /// Binds `word` to `category`. Returns false if the binding already existed.
  pub fn insert(&mut self, word: &str, category: Category) -> bool {
    let word = word.to_ascii_lowercase();
    if !self.entries.contains_key(&word) {
      self.order.push(word.clone());
    }
    let bindings = self.entries.entry(word.clone()).or_default();

    if bindings.iter().any(|t| t.category == category) {
      return false;
    }
    bindings.push(Terminal::new(word, category));
    self.categories.insert(category);
    true
  }

  /// Every binding for `word`, in insertion order. Empty for unknown words.
  pub fn lookup(&self, word: &str) -> &[Terminal] {
    self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn binding(&self, word: &str, category: Category) -> Option<&Terminal> {
    self.lookup(word).iter().find(|t| t.category == category)
  }

  pub fn contains(&self, word: &str) -> bool {
    self.entries.contains_key(word)
  }

  /// True iff some word is bound to `category`
  pub fn has_category(&self, category: Category) -> bool {
    self.categories.contains(&category)
  }

  pub fn categories(&self) -> &HashSet<Category> {
    &self.categories
  }

  /// All terminals, grouped by word in first-insertion order.
  pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
    self.order.iter().flat_map(move |w| self.lookup(w).iter())
  }

  /// Number of distinct words
  pub fn len(&self) -> usize {
    self.order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
