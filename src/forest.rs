use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::category::Category;
use crate::earley::Chart;
use crate::lexicon::Terminal;
use crate::rules::GrammarRule;
use crate::syntree::{Constituent, ParseTree, Word};
use crate::utils::combinations;

/// A completed rule over a span of the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForestState {
  rule: Arc<GrammarRule>,
  span: (usize, usize),
}

impl ForestState {
  pub fn new(rule: &Arc<GrammarRule>, start: usize, end: usize) -> Self {
    Self {
      rule: rule.clone(),
      span: (start, end),
    }
  }

  pub fn rule(&self) -> &GrammarRule {
    &self.rule
  }

  pub fn span(&self) -> (usize, usize) {
    self.span
  }
}

impl fmt::Display for ForestState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.rule)
  }
}

impl From<&ForestState> for Constituent {
  fn from(state: &ForestState) -> Self {
    Constituent {
      category: state.rule.lhs,
      span: state.span,
    }
  }
}

/// A child slot while searching for a rule's children: either a word already
/// turned into a leaf, or a completed rule still to be expanded.
#[derive(Debug, Clone)]
enum Pending<'f> {
  Leaf(ParseTree),
  Branch(&'f ForestState),
}

/// Completed chart states regrouped by origin, plus the scanned terminals
/// of each token.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
  by_origin: Vec<Vec<ForestState>>,
  scanned: Vec<Vec<Terminal>>,
}

impl Forest {
  /// Number of tokens the forest was built over
  pub fn len(&self) -> usize {
    self.scanned.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Completed states starting at `origin`. Empty past the end of the input.
  pub fn states_from(&self, origin: usize) -> &[ForestState] {
    self.by_origin.get(origin).map(Vec::as_slice).unwrap_or(&[])
  }

  fn leaf(&self, at: usize, category: Category) -> Option<ParseTree> {
    self.scanned[at]
      .iter()
      .find(|t| t.category == category)
      .map(|t| {
        ParseTree::Leaf(Word {
          terminal: t.clone(),
          span: (at, at + 1),
        })
      })
  }

  /// Takes a rule and search span, and returns every sequence of children
  /// that matches the rule's right-hand side from `prod_idx` on and exactly
  /// covers `search_start..search_end`.
  ///
  /// For `S -> S Conjunction S` over "a and b and c" (0..5), the
  /// sequences are `[S 0..1, and, S 2..5]` and `[S 0..3, and, S 4..5]`.
  fn extend_out(
    &self,
    rule: &GrammarRule,
    prod_idx: usize,
    search_start: usize,
    search_end: usize,
  ) -> Vec<Vec<Pending<'_>>> {
    if prod_idx == rule.len() {
      return if search_start == search_end {
        // base case, we consumed the whole rule and the whole span together.
        // provide a single empty sequence as a base for prepending onto as we unwind the stack
        vec![Vec::new()]
      } else {
        Vec::new()
      };
    }

    let wanted = rule.rhs[prod_idx];
    let mut sequences = Vec::new();

    // a word scanned as `wanted` at the search start
    if search_start < search_end {
      if let Some(leaf) = self.leaf(search_start, wanted) {
        for mut seq in self.extend_out(rule, prod_idx + 1, search_start + 1, search_end) {
          seq.insert(0, Pending::Leaf(leaf.clone()));
          sequences.push(seq);
        }
      }
    }

    // or a completed rule for `wanted` that starts at the search start and
    // fits inside the search range. zero-width completions count, so
    // epsilon rules can fill a slot.
    for state in self
      .states_from(search_start)
      .iter()
      .filter(|s| s.span.1 <= search_end && s.rule.lhs == wanted)
    {
      for mut seq in self.extend_out(rule, prod_idx + 1, state.span.1, search_end) {
        seq.insert(0, Pending::Branch(state));
        sequences.push(seq);
      }
    }

    sequences
  }

  /// Every fully populated tree for `state`. `active` holds the states being
  /// expanded further up the stack; re-entering one would derive the same
  /// span from itself forever, so that path yields nothing.
  ///
  /// Cycles only pass through states of equal span, so a state with no child
  /// over its own whole span has the same trees whatever is active, and those
  /// are kept in `memo`.
  fn make_trees<'f>(
    &'f self,
    state: &'f ForestState,
    active: &mut Vec<&'f ForestState>,
    memo: &mut HashMap<&'f ForestState, Vec<ParseTree>>,
  ) -> Vec<ParseTree> {
    if let Some(trees) = memo.get(state) {
      return trees.clone();
    }
    if active.contains(&state) {
      return Vec::new();
    }
    active.push(state);

    let mut trees = Vec::new();
    let mut standalone = true;
    for children in self.extend_out(&state.rule, 0, state.span.0, state.span.1) {
      let mut child_sets = Vec::with_capacity(children.len());
      for child in children {
        child_sets.push(match child {
          Pending::Leaf(leaf) => vec![leaf],
          Pending::Branch(s) => {
            standalone &= s.span != state.span;
            self.make_trees(s, active, memo)
          }
        });
      }
      for set in combinations(&child_sets) {
        trees.push(ParseTree::Branch(state.into(), set));
      }
    }

    active.pop();
    if standalone {
      memo.insert(state, trees.clone());
    }
    trees
  }

  /// All trees for `start` that span the whole input.
  pub fn trees(&self, start: Category) -> Vec<ParseTree> {
    // seed our search with all completed rules that started at position 0,
    // span to the end of the input, and are headed by the start category
    let mut active = Vec::new();
    let mut memo = HashMap::new();
    let mut trees = Vec::new();
    for root in self
      .states_from(0)
      .iter()
      .filter(|s| s.span.1 == self.len() && s.rule.lhs == start)
    {
      trees.append(&mut self.make_trees(root, &mut active, &mut memo));
    }
    trees
  }
}

impl From<Chart> for Forest {
  fn from(chart: Chart) -> Self {
    let (sets, scanned) = chart.into_parts();
    // zero-width rules can complete at the end of the input, so every chart
    // position is a possible origin
    let mut by_origin = vec![Vec::new(); sets.len()];

    for (k, states) in sets.into_iter().enumerate() {
      for state in states {
        // exclude unfinished rules that can't contribute to a tree
        if state.is_complete() {
          by_origin[state.origin].push(ForestState::new(&state.rule, state.origin, k));
        }
      }
    }

    Self { by_origin, scanned }
  }
}

impl fmt::Display for Forest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for k in 0..self.by_origin.len() {
      writeln!(f, "Origin {}:", k)?;
      for fs in self.by_origin[k].iter() {
        writeln!(f, "  {}", fs)?;
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::{Grammar, tokenize};
  use Category::*;

  fn conjunctions() -> Grammar {
    let mut g = Grammar::default();
    g.add_rule(GrammarRule::new(Sentence, [Agent]));
    g.add_rule(GrammarRule::new(Sentence, [Sentence, Conjunction, Sentence]));
    g.add_lexical_entry("alice", Agent);
    g.add_lexical_entry("bob", Agent);
    g.add_lexical_entry("carol", Agent);
    g.add_lexical_entry("and", Conjunction);
    g
  }

  #[test]
  fn test_forest_from_chart() {
    let g = conjunctions();
    let forest = g.parse_forest(&tokenize("alice and bob"));
    let atom = g.rules_for(Sentence)[0].clone();
    let conj = g.rules_for(Sentence)[1].clone();

    assert_eq!(forest.len(), 3);
    assert_eq!(
      forest.states_from(0),
      &[ForestState::new(&atom, 0, 1), ForestState::new(&conj, 0, 3)]
    );
    assert!(forest.states_from(1).is_empty());
    assert_eq!(forest.states_from(2), &[ForestState::new(&atom, 2, 3)]);
    assert!(forest.states_from(3).is_empty());
    assert!(forest.states_from(4).is_empty());

    println!("{}", forest);
  }

  #[test]
  fn test_tree_generation() {
    // the correct algorithm finds 2 trees:
    //  [alice and bob] and carol
    //  alice and [bob and carol]
    // naive forest processing also glues spans that don't tile the input
    let g = conjunctions();
    let trees = g.parse_forest(&tokenize("alice and bob and carol")).trees(Sentence);

    for tree in trees.iter() {
      println!("{}\n", tree);
    }

    assert_eq!(trees.len(), 2);
    for tree in trees.iter() {
      assert_eq!(tree.span(), (0, 5));
      assert_eq!(
        tree.leaves().collect::<Vec<_>>(),
        vec!["alice", "and", "bob", "and", "carol"]
      );
    }
    let splits = trees
      .iter()
      .map(|t| t.children()[0].span())
      .collect::<Vec<_>>();
    assert!(splits.contains(&(0, 1)));
    assert!(splits.contains(&(0, 3)));
  }

  #[test]
  fn test_coordination_ambiguity_is_catalan() {
    let mut g = conjunctions();
    g.add_lexical_entry("dave", Agent);
    g.add_lexical_entry("eve", Agent);

    for (sentence, bracketings) in [
      ("alice and bob and carol and dave", 5),
      ("alice and bob and carol and dave and eve", 14),
    ] {
      let trees = g.parse(sentence);
      assert_eq!(trees.len(), bracketings, "{}", sentence);
      for (i, tree) in trees.iter().enumerate() {
        assert!(trees[i + 1..].iter().all(|other| other != tree));
        assert_eq!(tree.leaves().collect::<Vec<_>>(), tokenize(sentence));
      }
    }
  }

  #[test]
  fn test_branches_are_populated() {
    let g = conjunctions();
    let trees = g.parse_forest(&tokenize("alice and bob")).trees(Sentence);
    assert_eq!(trees.len(), 1);

    let (cons, children) = trees[0].get_branch().unwrap();
    assert_eq!(cons.category, Sentence);
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].category(), Sentence);
    assert_eq!(children[0].children().len(), 1);
    assert!(children[0].children()[0].is_terminal());
    assert_eq!(children[1].terminal(), &Terminal::new("and", Conjunction));
  }

  #[test]
  fn test_epsilon_children() {
    let mut g = Grammar::default();
    g.add_rule(GrammarRule::new(Sentence, [Agent, Negation, Action]));
    g.add_rule(GrammarRule::new(Negation, Vec::new()));
    g.add_lexical_entry("alice", Agent);
    g.add_lexical_entry("run", Action);

    let trees = g.parse("alice run");
    assert_eq!(trees.len(), 1);
    let children = trees[0].children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[1].category(), Negation);
    assert_eq!(children[1].span(), (1, 1));
    assert!(children[1].children().is_empty());
    assert_eq!(trees[0].leaves().collect::<Vec<_>>(), vec!["alice", "run"]);
  }

  #[test]
  fn test_nullable_start_accepts_empty_input() {
    let mut g = Grammar::default();
    g.add_rule(GrammarRule::new(Sentence, Vec::new()));
    let trees = g.parse("");
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].span(), (0, 0));
    assert_eq!(trees[0].leaves().count(), 0);
  }

  #[test]
  fn test_epsilon_rule_on_terminal_category() {
    let mut g = Grammar::default();
    g.add_rule(GrammarRule::new(Sentence, [Agent, Fluent, Action]));
    g.add_rule(GrammarRule::new(Fluent, [Negation]));
    g.add_rule(GrammarRule::new(Negation, Vec::new()));
    g.add_lexical_entry("alice", Agent);
    g.add_lexical_entry("run", Action);
    g.add_lexical_entry("not", Negation);

    // Negation is scanned, so it can't be skipped over
    for (sentence, readings) in [("alice run", 0), ("alice not run", 1)] {
      let trees = g.parse(sentence);
      assert_eq!(trees.len(), readings, "{}", sentence);
      assert_eq!(g.recognize(sentence), !trees.is_empty(), "{}", sentence);
    }

    let trees = g.parse("alice not run");
    assert_eq!(trees[0].children()[1].category(), Fluent);
    assert!(trees[0].children()[1].children()[0].is_terminal());
  }

  #[test]
  fn test_recognize_agrees_with_trees() {
    let mut g = Grammar::default();
    g.add_rule(GrammarRule::new(Sentence, [Agent, Fluent, Action]));
    g.add_rule(GrammarRule::new(Sentence, [Fluent]));
    g.add_rule(GrammarRule::new(Fluent, [Negation, Negation]));
    g.add_rule(GrammarRule::new(Fluent, [Sentence]));
    g.add_rule(GrammarRule::new(Negation, Vec::new()));
    g.add_rule(GrammarRule::new(Action, Vec::new()));
    g.add_lexical_entry("alice", Agent);
    g.add_lexical_entry("not", Negation);

    for sentence in ["", "alice", "not", "not not", "alice not", "alice not not", "not alice"] {
      let trees = g.parse(sentence);
      assert_eq!(g.recognize(sentence), !trees.is_empty(), "{:?}", sentence);
      for tree in trees.iter() {
        assert_eq!(tree.leaves().collect::<Vec<_>>(), tokenize(sentence));
      }
    }
  }

  #[test]
  fn test_unit_cycles_are_finite() {
    let mut g = Grammar::default();
    g.add_rule(GrammarRule::new(Sentence, [Fluent]));
    g.add_rule(GrammarRule::new(Fluent, [Sentence]));
    g.add_rule(GrammarRule::new(Fluent, [Adjective]));
    g.add_lexical_entry("open", Adjective);

    let trees = g.parse("open");
    // S -> F -> open, and the cycle cut at S -> F -> S
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].leaves().collect::<Vec<_>>(), vec!["open"]);
  }
}
