use crate::grammar::Grammar;

/// Deontic, cognitive and temporal constructions over a small vocabulary.
pub const REFERENCE_GRAMMAR: &str = r#"
  Sentence -> Deontic
            | Cognitive
            | Temporal
            | Fluent
            | NounPhrase VerbPhrase
            | Sentence Conjunction Sentence;

  // obligation and permission: "alice must pay the fee", "bob may not leave"
  Deontic -> Agent Modal Action
           | Agent Modal Negation Action
           | Agent Modal Action NounPhrase;

  // belief and knowledge: "carol believes that bob should sign the contract"
  Cognitive -> Agent CognitiveVerb Complementizer Sentence
             | Agent CognitiveVerb Sentence;

  // "always alice must pay", "bob must pay before alice leaves"
  Temporal -> TemporalOperator Sentence
            | Sentence TemporalConnective Sentence;

  // "the door is open", "the rent is not due"
  Fluent -> NounPhrase Copula Adjective
          | NounPhrase Copula Negation Adjective;

  NounPhrase -> Agent
              | Determiner Noun
              | Determiner Adjective Noun;

  VerbPhrase -> Verb
              | Verb NounPhrase
              | Modal Verb
              | Modal Verb NounPhrase
              | Modal Negation Verb;

  // lexicon
  Agent -> alice | bob | carol | dave | everyone;
  Modal -> must | should | may | can | shall;
  Negation -> not;
  Action -> run | open | close | pay | leave | sign | enter | report | stop | wait;
  Verb -> run | open | close | pay | leave | sign | enter | report | stop | wait
        | runs | opens | closes | pays | leaves | signs | enters | reports | stops | waits;
  CognitiveVerb -> believes | knows | thinks | doubts | expects;
  TemporalOperator -> always | eventually | never | sometimes;
  TemporalConnective -> before | after | until | while | when;
  Complementizer -> that;
  Determiner -> the | a | an | every | some;
  Noun -> door | fee | contract | rent | window | form | report;
  Adjective -> open | closed | late | due | valid | signed;
  Copula -> is | are | was;
  Conjunction -> and | or;
"#;

impl Grammar {
  /// The built-in modal grammar, starting at `Sentence`.
  pub fn reference() -> Self {
    REFERENCE_GRAMMAR
      .parse()
      .expect("reference grammar is well-formed")
  }
}

#[cfg(test)]
mod tests {
  use crate::category::Category::{self, *};
  use crate::grammar::{Grammar, tokenize};
  use crate::syntree::ParseTree;

  fn leaves(tree: &ParseTree) -> Vec<&str> {
    tree.leaves().collect()
  }

  /// Whether any node of `tree` is labelled `target`
  fn has_node(tree: &ParseTree, target: Category) -> bool {
    tree.category() == target || tree.children().iter().any(|c| has_node(c, target))
  }

  #[test]
  fn test_accepted_sentences_reproduce_tokens() {
    let g = Grammar::reference();
    let sentences = [
      "alice must run",
      "bob should open",
      "Alice MAY not leave",
      "carol must pay the fee",
      "dave believes that alice must sign the contract",
      "everyone knows bob may enter",
      "always alice must pay",
      "bob must pay before alice leaves",
      "the door is open",
      "the rent is not due",
      "alice pays the fee and bob signs the form",
      "eventually the window is closed",
    ];

    for sentence in sentences {
      let trees = g.parse(sentence);
      assert!(!trees.is_empty(), "no parse for {:?}", sentence);
      let tokens = tokenize(sentence);
      for tree in trees.iter() {
        assert_eq!(tree.category(), Sentence);
        assert_eq!(tree.span(), (0, tokens.len()));
        assert_eq!(leaves(tree), tokens, "{}", tree);
      }
      assert!(g.recognize(sentence));
    }
  }

  #[test]
  fn test_deontic_path() {
    let g = Grammar::reference();
    let trees = g.parse("alice must run");
    assert!(!trees.is_empty());

    let deontic = trees
      .iter()
      .find(|t| t.children().len() == 1 && t.children()[0].category() == Deontic)
      .expect("deontic reading");
    let cats = deontic.children()[0]
      .children()
      .iter()
      .map(ParseTree::category)
      .collect::<Vec<_>>();
    assert_eq!(cats, vec![Agent, Modal, Action]);
    assert!(deontic.children()[0].children().iter().all(ParseTree::is_terminal));
  }

  #[test]
  fn test_modal_verb_phrase_path() {
    let g = Grammar::reference();
    let trees = g.parse("bob should open");
    let np_vp = trees
      .iter()
      .find(|t| {
        t.children().iter().map(ParseTree::category).collect::<Vec<_>>() == vec![NounPhrase, VerbPhrase]
      })
      .expect("noun phrase + verb phrase reading");

    let vp = &np_vp.children()[1];
    assert_eq!(vp.children().iter().map(ParseTree::category).collect::<Vec<_>>(), vec![Modal, Verb]);
    assert_eq!(vp.span(), (1, 3));
    // and the deontic reading is there as well
    assert!(trees.iter().any(|t| has_node(t, Deontic)));
    assert_eq!(trees.len(), 2);
  }

  #[test]
  fn test_cognitive_embeds_deontic() {
    let g = Grammar::reference();
    let trees = g.parse("dave believes that alice must sign the contract");
    assert!(trees.iter().any(|t| has_node(t, Cognitive) && has_node(t, Deontic)));
    assert!(trees.iter().all(|t| has_node(t, Complementizer)));
  }

  #[test]
  fn test_fluent() {
    let g = Grammar::reference();
    let trees = g.parse("the door is open");
    assert_eq!(trees.len(), 1);
    assert!(has_node(&trees[0], Fluent));
  }

  #[test]
  fn test_empty_input() {
    let g = Grammar::reference();
    assert!(g.parse("").is_empty());
    assert!(g.parse("   \t ").is_empty());
    assert!(!g.recognize(""));
  }

  #[test]
  fn test_unknown_word() {
    let g = Grammar::reference();
    assert!(g.parse("xyzzy run").is_empty());
    assert!(g.parse("alice must xyzzy").is_empty());
  }

  #[test]
  fn test_out_of_grammar() {
    let g = Grammar::reference();
    assert!(g.parse("must alice run").is_empty());
    assert!(g.parse("alice must").is_empty());
    assert!(g.parse("the the door").is_empty());
  }

  #[test]
  fn test_parse_is_idempotent() {
    let g = Grammar::reference();
    let sentence = "alice must pay before bob leaves and carol signs";
    let first = g.parse(sentence);
    let second = g.parse(sentence);
    assert!(!first.is_empty());
    assert_eq!(first, second);
  }

  #[test]
  fn test_ambiguity_gives_distinct_trees() {
    let g = Grammar::reference();
    // [alice runs and bob runs] or carol runs / alice runs and [bob runs or carol runs]
    let trees = g.parse("alice runs and bob runs or carol runs");
    assert_eq!(trees.len(), 2);
    assert_ne!(trees[0], trees[1]);
  }

  #[test]
  fn test_concurrent_parses() {
    let g = Grammar::reference();
    let expected = g.parse("carol must pay the fee").len();

    std::thread::scope(|s| {
      let handles = (0..4)
        .map(|_| s.spawn(|| g.parse("carol must pay the fee").len()))
        .collect::<Vec<_>>();
      for h in handles {
        assert_eq!(h.join().unwrap(), expected);
      }
    });
  }
}
