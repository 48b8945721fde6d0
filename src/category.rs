use std::fmt;
use std::str::FromStr;

use crate::Err;

/// The closed set of labels a grammar can use, structural and lexical alike.
///
/// Whether a category behaves as a terminal is not fixed here: it is derived
/// from the lexicon of the grammar the category appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
  Sentence,
  NounPhrase,
  VerbPhrase,
  /// Obligation, permission and prohibition
  Deontic,
  /// Belief and knowledge
  Cognitive,
  Temporal,
  Agent,
  Action,
  /// A time-varying property of the world ("the door is open")
  Fluent,
  Noun,
  Verb,
  Modal,
  Negation,
  CognitiveVerb,
  TemporalOperator,
  TemporalConnective,
  Complementizer,
  Determiner,
  Adjective,
  Copula,
  Conjunction,
}

impl Category {
  pub const ALL: [Category; 21] = [
    Self::Sentence,
    Self::NounPhrase,
    Self::VerbPhrase,
    Self::Deontic,
    Self::Cognitive,
    Self::Temporal,
    Self::Agent,
    Self::Action,
    Self::Fluent,
    Self::Noun,
    Self::Verb,
    Self::Modal,
    Self::Negation,
    Self::CognitiveVerb,
    Self::TemporalOperator,
    Self::TemporalConnective,
    Self::Complementizer,
    Self::Determiner,
    Self::Adjective,
    Self::Copula,
    Self::Conjunction,
  ];

  pub fn name(&self) -> &'static str {
    match self {
      Self::Sentence => "Sentence",
      Self::NounPhrase => "NounPhrase",
      Self::VerbPhrase => "VerbPhrase",
      Self::Deontic => "Deontic",
      Self::Cognitive => "Cognitive",
      Self::Temporal => "Temporal",
      Self::Agent => "Agent",
      Self::Action => "Action",
      Self::Fluent => "Fluent",
      Self::Noun => "Noun",
      Self::Verb => "Verb",
      Self::Modal => "Modal",
      Self::Negation => "Negation",
      Self::CognitiveVerb => "CognitiveVerb",
      Self::TemporalOperator => "TemporalOperator",
      Self::TemporalConnective => "TemporalConnective",
      Self::Complementizer => "Complementizer",
      Self::Determiner => "Determiner",
      Self::Adjective => "Adjective",
      Self::Copula => "Copula",
      Self::Conjunction => "Conjunction",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

impl FromStr for Category {
  type Err = Err;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .iter()
      .copied()
      .find(|c| c.name() == s)
      .ok_or_else(|| format!("unknown category {}", s).into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_names_parse_back() {
    for c in Category::ALL {
      assert_eq!(c.to_string().parse::<Category>().unwrap(), c);
    }
  }

  #[test]
  fn test_unknown_name() {
    assert!("Adverb".parse::<Category>().is_err());
    // names are case sensitive, lowercase is reserved for words
    assert!("sentence".parse::<Category>().is_err());
  }

  #[test]
  fn test_declaration_order() {
    let mut sorted = Category::ALL;
    sorted.sort();
    assert_eq!(sorted, Category::ALL);
  }
}
