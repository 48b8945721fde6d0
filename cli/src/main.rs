use std::env;
use std::io;
use std::io::Write;
use std::process;

use modal_earley::{Err, Grammar, tokenize};
use tracing_subscriber::EnvFilter;

fn usage(prog_name: &str) -> String {
  format!(
    r"Usage: {} [options]

Reads sentences from stdin and parses them with the reference modal grammar.
Set RUST_LOG (e.g. RUST_LOG=modal_earley=trace) to see parser events.

Options:
  -h, --help       Print this message
  -c, --chart      Print the parse chart (defaults to not printing)
  -v, --validate   Print grammar diagnostics before reading input
  -g, --grammar    Print the grammar before reading input",
    prog_name
  )
}

fn parse(g: &Grammar, sentence: &str, print_chart: bool) {
  if print_chart {
    let chart = g.parse_chart(&tokenize(sentence));
    println!("chart:\n{}\n", chart);
  }

  let trees = g.parse(sentence);

  println!(
    "Parsed {} tree{}",
    trees.len(),
    if trees.len() == 1 { "" } else { "s" }
  );

  for t in trees {
    println!("{}", t.to_string_indented(0));
  }
}

struct Args {
  print_chart: bool,
  print_diagnostics: bool,
  print_grammar: bool,
}

impl Args {
  fn make_error_message(msg: &str, prog_name: impl AsRef<str>) -> String {
    format!("argument error: {}.\n\n{}", msg, usage(prog_name.as_ref()))
  }

  fn parse(v: Vec<String>) -> Result<Self, String> {
    let mut iter = v.into_iter();
    let prog_name = match iter.next() {
      Some(name) => name,
      None => return Err(Self::make_error_message("bad argument vector", "cli")),
    };

    let mut args = Self {
      print_chart: false,
      print_diagnostics: false,
      print_grammar: false,
    };

    for o in iter {
      match o.as_str() {
        "-h" | "--help" => {
          println!("{}", usage(&prog_name));
          process::exit(0);
        }
        "-c" | "--chart" => args.print_chart = true,
        "-v" | "--validate" => args.print_diagnostics = true,
        "-g" | "--grammar" => args.print_grammar = true,
        _ => return Err(Self::make_error_message("invalid arguments", prog_name)),
      }
    }

    Ok(args)
  }
}

fn main() -> Result<(), Err> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  let opts = match Args::parse(env::args().collect()) {
    Ok(opts) => opts,
    Err(msg) => {
      eprintln!("{}", msg);
      process::exit(255);
    }
  };

  let g = Grammar::reference();

  if opts.print_grammar {
    println!("{}", g);
  }
  if opts.print_diagnostics {
    println!("{}\n", g.diagnose());
  }

  let mut input = String::new();
  loop {
    print!("> ");
    io::stdout().flush()?;

    match io::stdin().read_line(&mut input) {
      Ok(_) => {
        if input.is_empty() {
          // ctrl+d
          return Ok(());
        }
        parse(&g, input.trim(), opts.print_chart);
        input.clear();
      }
      Err(error) => return Err(error.into()),
    }
  }
}
