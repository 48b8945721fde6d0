use modal_earley::{Err, Grammar};

const SENTENCES: &[&str] = &[
  "Alice must pay the fee",
  "Bob should open",
  "Carol believes that Dave may not leave",
  "always the door is closed",
  "xyzzy run",
];

fn main() -> Result<(), Err> {
  let g = Grammar::reference();

  let (valid, issues) = g.validate_grammar();
  if !valid {
    return Err(issues.join("; ").into());
  }

  for sentence in SENTENCES {
    let trees = g.parse(sentence);
    println!(
      "{:?}: parsed {} tree{}",
      sentence,
      trees.len(),
      if trees.len() == 1 { "" } else { "s" }
    );
    for t in trees {
      print!("{}", t.to_string_indented(1));
    }
    println!();
  }

  Ok(())
}
