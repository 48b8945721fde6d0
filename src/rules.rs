use std::fmt;

use crate::category::Category;

/// A production `lhs -> rhs[0] rhs[1] ...`. Two rules are the same rule when
/// their left-hand sides and full right-hand sides match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrammarRule {
  pub lhs: Category,
  pub rhs: Vec<Category>,
}

impl GrammarRule {
  pub fn new(lhs: Category, rhs: impl Into<Vec<Category>>) -> Self {
    Self {
      lhs,
      rhs: rhs.into(),
    }
  }

  pub fn len(&self) -> usize {
    self.rhs.len()
  }

  /// An epsilon rule
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn get(&self, idx: usize) -> Option<Category> {
    self.rhs.get(idx).copied()
  }
}

impl fmt::Display for GrammarRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.lhs)?;
    for c in self.rhs.iter() {
      write!(f, " {}", c)?;
    }
    Ok(())
  }
}
