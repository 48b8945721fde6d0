use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::category::Category;
use crate::grammar::Grammar;
use crate::lexicon::Terminal;
use crate::rules::GrammarRule;

/// A dotted rule that started at `origin` and has reached `current`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EarleyState {
  pub rule: Arc<GrammarRule>,
  pub dot: usize,
  pub origin: usize,
  pub current: usize,
}

impl EarleyState {
  pub fn new(rule: &Arc<GrammarRule>, origin: usize) -> Self {
    Self {
      rule: rule.clone(),
      dot: 0,
      origin,
      current: origin,
    }
  }

  pub fn is_complete(&self) -> bool {
    self.dot == self.rule.len()
  }

  /// The category right after the dot, if the state isn't complete
  pub fn next_category(&self) -> Option<Category> {
    self.rule.get(self.dot)
  }

  /// Moves the dot over one symbol, ending at `current`
  pub fn advance(&self, current: usize) -> Self {
    assert!(!self.is_complete(), "tried to advance a complete state");
    Self {
      rule: self.rule.clone(),
      dot: self.dot + 1,
      origin: self.origin,
      current,
    }
  }
}

impl fmt::Display for EarleyState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {} →", self.origin, self.current, self.rule.lhs)?;
    for (idx, c) in self.rule.rhs.iter().enumerate() {
      if idx == self.dot {
        write!(f, " ・")?;
      }
      write!(f, " {}", c)?;
    }
    if self.is_complete() {
      write!(f, " ・")?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, Default)]
struct StateSet {
  states: Vec<EarleyState>,
  seen: HashSet<EarleyState>,
}

/// One state set per token boundary, plus the terminals the scanner consumed
/// at each token.
#[derive(Debug)]
pub struct Chart {
  sets: Vec<StateSet>,
  scanned: Vec<Vec<Terminal>>,
}

impl Chart {
  /// A chart for `tokens` tokens, which has `tokens + 1` sets
  pub fn new(tokens: usize) -> Self {
    Self {
      sets: vec![StateSet::default(); tokens + 1],
      scanned: vec![Vec::new(); tokens],
    }
  }

  pub fn len(&self) -> usize {
    self.sets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn len_at(&self, k: usize) -> usize {
    self.sets[k].states.len()
  }

  pub fn states_at(&self, k: usize) -> &[EarleyState] {
    &self.sets[k].states
  }

  /// Total number of states over all sets
  pub fn state_count(&self) -> usize {
    self.sets.iter().map(|s| s.states.len()).sum()
  }

  pub fn has(&self, k: usize, state: &EarleyState) -> bool {
    self.sets[k].seen.contains(state)
  }

  /// Adds `state` to set `k`, returning false if an equal state was already
  /// there.
  pub fn add(&mut self, k: usize, state: EarleyState) -> bool {
    debug_assert_eq!(state.current, k, "state added to the wrong set");
    let set = &mut self.sets[k];
    if set.seen.contains(&state) {
      return false;
    }
    set.seen.insert(state.clone());
    set.states.push(state);
    true
  }

  /// Get an owned state so that passing around &mut chart is more ergonomic
  fn get_state(&self, k: usize, idx: usize) -> EarleyState {
    self.sets[k].states[idx].clone()
  }

  fn record_scan(&mut self, k: usize, terminal: &Terminal) {
    if !self.scanned[k].contains(terminal) {
      self.scanned[k].push(terminal.clone());
    }
  }

  /// Terminals consumed from token `k`
  pub fn scanned_at(&self, k: usize) -> &[Terminal] {
    &self.scanned[k]
  }

  /// Complete states for `start` that span the whole input
  pub fn roots(&self, start: Category) -> impl Iterator<Item = &EarleyState> {
    self.sets[self.len() - 1]
      .states
      .iter()
      .filter(move |s| s.is_complete() && s.origin == 0 && s.rule.lhs == start)
  }

  pub fn accepts(&self, start: Category) -> bool {
    self.roots(start).next().is_some()
  }

  /// Splits the chart into its state sets and the per-token scanned terminals
  pub fn into_parts(self) -> (Vec<Vec<EarleyState>>, Vec<Vec<Terminal>>) {
    let sets = self.sets.into_iter().map(|s| s.states).collect();
    (sets, self.scanned)
  }
}

impl fmt::Display for Chart {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for k in 0..self.len() {
      writeln!(f, "State {}:", k)?;
      for state in self.sets[k].states.iter() {
        writeln!(f, "  {}", state)?;
      }
    }
    Ok(())
  }
}

pub fn parse_chart(g: &Grammar, tokens: &[String]) -> Chart {
  let mut chart = Chart::new(tokens.len());

  for rule in g.rules_for(g.start()) {
    chart.add(0, EarleyState::new(rule, 0));
  }

  for (k, token) in tokens.iter().enumerate() {
    if !g.lexicon().contains(token) {
      tracing::debug!(position = k, token = %token, "token has no lexicon binding");
    }
  }

  for k in 0..chart.len() {
    // need to use while loop because the number of states at k can expand during the loop
    let mut idx = 0;
    while idx < chart.len_at(k) {
      let state = chart.get_state(k, idx);
      idx += 1;

      match state.next_category() {
        None => completer(&mut chart, k, &state),
        Some(c) if g.is_terminal(c) => scanner(g, &mut chart, k, &state, c, tokens),
        Some(c) => predictor(g, &mut chart, k, &state, c),
      };
    }
  }

  tracing::debug!(
    tokens = tokens.len(),
    states = chart.state_count(),
    accepted = chart.accepts(g.start()),
    "chart complete"
  );

  chart
}

fn completer(chart: &mut Chart, k: usize, state: &EarleyState) {
  assert!(state.is_complete(), "tried to complete active state");
  tracing::trace!(%state, "complete");

  // the rule has been completed, now look for states in the chart that are waiting for its symbol
  let lhs = state.rule.lhs;
  for idx in 0..chart.len_at(state.origin) {
    let other = chart.get_state(state.origin, idx);

    if other.next_category() == Some(lhs) {
      // found one, advance its dot and add the new state to the chart *at k*,
      // because it's now waiting on a token there
      chart.add(k, other.advance(k));
    }
  }
}

fn predictor(g: &Grammar, chart: &mut Chart, k: usize, state: &EarleyState, needed: Category) {
  assert!(!state.is_complete(), "tried to predict non-active state");
  tracing::trace!(%state, %needed, "predict");

  // this state is waiting for `needed`
  // let's hypothesize that one of the rules that can build it will
  // succeed at its current position
  for wanted_rule in g.rules_for(needed) {
    chart.add(k, EarleyState::new(wanted_rule, k));
  }

  if g.is_nullable(needed) {
    // automatically complete `state` early, because we know it will be
    // completable anyways, since `needed` may be produced by empty input.
    // If we don't do this, nullable rules won't be completed correctly,
    // because complete() won't run after predict() without a new symbol.
    chart.add(k, state.advance(k));
  }
}

fn scanner(
  g: &Grammar,
  chart: &mut Chart,
  k: usize,
  state: &EarleyState,
  needed: Category,
  tokens: &[String],
) {
  assert!(!state.is_complete(), "tried to scan non-active state");

  if k >= tokens.len() {
    return;
  }

  if let Some(terminal) = g.lexicon().binding(&tokens[k], needed) {
    tracing::trace!(%state, %terminal, "scan");
    // advance the state to consume this token, and add to state k + 1, where
    // it will look for the next token
    chart.record_scan(k, terminal);
    chart.add(k + 1, state.advance(k + 1));
  }
}
