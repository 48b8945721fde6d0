use std::fmt;

use crate::category::Category;
use crate::lexicon::Terminal;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Constituent {
  pub category: Category,
  pub span: (usize, usize),
}

impl fmt::Display for Constituent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.category)
  }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Word {
  pub terminal: Terminal,
  pub span: (usize, usize),
}

impl fmt::Display for Word {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.terminal)
  }
}

/// A derivation. Leaves are scanned words, branches are completed rules whose
/// children tile the branch's span.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseTree {
  Branch(Constituent, Vec<ParseTree>),
  Leaf(Word),
}

impl ParseTree {
  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn category(&self) -> Category {
    match self {
      Self::Branch(c, _) => c.category,
      Self::Leaf(w) => w.terminal.category,
    }
  }

  /// Half-open token range covered by this subtree
  pub fn span(&self) -> (usize, usize) {
    match self {
      Self::Branch(c, _) => c.span,
      Self::Leaf(w) => w.span,
    }
  }

  /// Children of a branch; always empty for a leaf.
  pub fn children(&self) -> &[ParseTree] {
    match self {
      Self::Branch(_, children) => children.as_slice(),
      Self::Leaf(_) => &[],
    }
  }

  pub fn get_leaf(&self) -> Option<&Word> {
    match self {
      Self::Leaf(w) => Some(w),
      _ => None,
    }
  }

  pub fn get_branch(&self) -> Option<(&Constituent, &Vec<ParseTree>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  /// The terminal a leaf wraps.
  ///
  /// # Panics
  ///
  /// If called on a branch. Use [`ParseTree::get_leaf`] when the kind of node
  /// isn't known.
  pub fn terminal(&self) -> &Terminal {
    match self {
      Self::Leaf(w) => &w.terminal,
      Self::Branch(c, _) => panic!("terminal() called on branch {}", c),
    }
  }

  /// The words under this subtree, left to right. Recomputed on every call.
  pub fn leaves(&self) -> Leaves<'_> {
    Leaves { stack: vec![self] }
  }

  /// Multi-line dump, one node per line, nested nodes indented two spaces
  /// deeper than their parent. `indent` is the depth of `self`.
  pub fn to_string_indented(&self, indent: usize) -> String {
    let mut out = String::new();
    self.write_indented(&mut out, indent);
    out
  }

  fn write_indented(&self, out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);
    match self {
      Self::Leaf(w) => {
        out.push_str(&format!("{}{} \"{}\"\n", pad, w.terminal.category, w.terminal.word));
      }
      Self::Branch(c, children) => {
        out.push_str(&format!("{}{} [{}..{}]\n", pad, c.category, c.span.0, c.span.1));
        for child in children {
          child.write_indented(out, indent + 1);
        }
      }
    }
  }
}

/// Depth-first iterator over the words of a [`ParseTree`].
pub struct Leaves<'a> {
  stack: Vec<&'a ParseTree>,
}

impl<'a> Iterator for Leaves<'a> {
  type Item = &'a str;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(node) = self.stack.pop() {
      match node {
        ParseTree::Leaf(w) => return Some(w.terminal.word.as_str()),
        ParseTree::Branch(_, children) => self.stack.extend(children.iter().rev()),
      }
    }
    None
  }
}

impl fmt::Display for ParseTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(t) => write!(f, "{}", t),
      Self::Branch(t, ts) => {
        write!(f, "({}", t)?;
        if ts.len() == 1 {
          write!(f, " ({}))", ts[0])
        } else {
          for t in ts.iter() {
            let fmt = format!("{}", t);
            for line in fmt.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
          write!(f, ")")
        }
      }
    }
  }
}
