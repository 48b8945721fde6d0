//! Earley chart parsing of deontic, cognitive and temporal modal sentences.
//!
//! ```
//! use modal_earley::{Category, Grammar};
//!
//! let g = Grammar::reference();
//! let trees = g.parse("alice must pay the fee");
//! assert!(!trees.is_empty());
//! assert_eq!(trees[0].category(), Category::Sentence);
//! assert_eq!(
//!   trees[0].leaves().collect::<Vec<_>>(),
//!   vec!["alice", "must", "pay", "the", "fee"]
//! );
//! ```

#[macro_use]
extern crate lazy_static;

pub mod category;
pub mod earley;
pub mod forest;
pub mod grammar;
pub mod lexicon;
pub mod parse_grammar;
pub mod reference;
pub mod rules;
pub mod syntree;
pub mod utils;
pub mod validate;

pub use crate::category::Category;
pub use crate::grammar::{Grammar, tokenize};
pub use crate::lexicon::{Lexicon, Terminal};
pub use crate::rules::GrammarRule;
pub use crate::syntree::ParseTree;
pub use crate::utils::Err;
pub use crate::validate::Diagnostics;

#[test]
fn test_custom_grammar_through_add_operations() {
  use Category::*;

  let mut g = Grammar::new(Deontic);
  g.add_rule(GrammarRule::new(Deontic, [Agent, Modal, Action]));
  g.add_lexical_entry("Alice", Agent);
  g.add_lexical_entry("may", Modal);
  g.add_lexical_entry("leave", Action);

  let trees = g.parse("alice MAY leave");
  assert_eq!(trees.len(), 1);
  assert_eq!(trees[0].category(), Deontic);
  assert!(g.validate_grammar().0);

  // synonyms share a category, and a new binding takes effect on the next parse
  assert!(g.parse("alice must leave").is_empty());
  g.add_lexical_entry("must", Modal);
  assert_eq!(g.parse("alice must leave").len(), 1);
}
