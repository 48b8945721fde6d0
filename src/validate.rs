//! Static checks over a grammar. Nothing here touches a chart, and the parser
//! never runs these on its own.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::category::Category;
use crate::grammar::Grammar;

/// Defects found by [`Grammar::diagnose`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnostics {
  /// Set when no rule is headed by the start category
  pub missing_start: Option<Category>,
  pub unreachable: BTreeSet<Category>,
  pub unproductive: BTreeSet<Category>,
}

impl Diagnostics {
  pub fn is_valid(&self) -> bool {
    self.missing_start.is_none() && self.unreachable.is_empty() && self.unproductive.is_empty()
  }

  pub fn issues(&self) -> Vec<String> {
    let mut issues = Vec::new();
    if let Some(start) = self.missing_start {
      issues.push(format!("missing start rule for {}", start));
    }
    if !self.unreachable.is_empty() {
      issues.push(format!("unreachable categories: {}", join(&self.unreachable)));
    }
    if !self.unproductive.is_empty() {
      issues.push(format!("unproductive categories: {}", join(&self.unproductive)));
    }
    issues
  }
}

fn join(categories: &BTreeSet<Category>) -> String {
  categories
    .iter()
    .map(Category::name)
    .collect::<Vec<_>>()
    .join(", ")
}

impl fmt::Display for Diagnostics {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_valid() {
      return write!(f, "grammar is valid");
    }
    for issue in self.issues() {
      writeln!(f, "{}", issue)?;
    }
    Ok(())
  }
}

impl Grammar {
  /// Categories reachable from the start category through rule right-hand
  /// sides, the start category included.
  fn reachable(&self) -> HashSet<Category> {
    let mut reachable = HashSet::new();
    let mut todo = vec![self.start()];
    while let Some(c) = todo.pop() {
      if !reachable.insert(c) {
        continue;
      }
      for rule in self.rules_for(c) {
        todo.extend(rule.rhs.iter().copied().filter(|r| !reachable.contains(r)));
      }
    }
    reachable
  }

  /// Categories that derive at least one finite word sequence.
  fn productive(&self) -> HashSet<Category> {
    let mut productive = self.lexicon().categories().clone();

    let mut last_length = usize::MAX;
    while last_length != productive.len() {
      last_length = productive.len();
      for r in self.rules().iter() {
        if !productive.contains(&r.lhs) && r.rhs.iter().all(|c| productive.contains(c)) {
          productive.insert(r.lhs);
        }
      }
    }

    productive
  }

  pub fn diagnose(&self) -> Diagnostics {
    let reachable = self.reachable();
    let productive = self.productive();

    let mut d = Diagnostics::default();
    if self.rules_for(self.start()).is_empty() {
      d.missing_start = Some(self.start());
    }
    for r in self.rules().iter() {
      if !reachable.contains(&r.lhs) {
        d.unreachable.insert(r.lhs);
      }
      if !productive.contains(&r.lhs) {
        d.unproductive.insert(r.lhs);
      }
    }

    tracing::debug!(
      valid = d.is_valid(),
      unreachable = d.unreachable.len(),
      unproductive = d.unproductive.len(),
      "validated grammar"
    );
    d
  }

  /// `(is_valid, issues)`, where `is_valid` is true iff `issues` is empty.
  pub fn validate_grammar(&self) -> (bool, Vec<String>) {
    let d = self.diagnose();
    (d.is_valid(), d.issues())
  }
}
