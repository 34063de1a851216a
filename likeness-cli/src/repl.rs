// Interactive REPL using editline

use std::io::Write;

use anyhow::{Result, bail};
use editline::{LineEditor, terminals::StdioTerminal};
use likeness_core::{Comparator, identical, read};

/// Evaluate one REPL line. One value prints its classification; two values
/// print both comparison verdicts. Labels are shared across the line, so
/// `#1=[1] #1#` compares an object with itself.
pub fn evaluate_line(comparator: &Comparator, line: &str) -> Result<String> {
    let values = read(line)?;
    match values.as_slice() {
        [] => Ok(String::new()),
        [value] => Ok(format!("{}\n{}", value, comparator.classify(value))),
        [left, right] => Ok(format!(
            "deep-equal: {}\nidentical: {}",
            comparator.deep_equal(left, right),
            identical(left, right)
        )),
        more => bail!("expected one or two values, found {}", more.len()),
    }
}

pub fn run_repl(comparator: &Comparator) -> Result<()> {
    println!();
    println!("likeness v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Type a value to classify it, or two values to compare them");
    println!("Example: #1={{self: #1#}} #2={{self: #2#}}");
    println!("Type `quit` or press Ctrl-D to exit");
    if comparator.is_headless() {
        println!("Running headless: no value is an element");
    }
    println!();

    let mut editor = LineEditor::new(1024, 50);
    let mut terminal = StdioTerminal::new();

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        match editor.read_line(&mut terminal) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "quit" {
                    break;
                }

                match evaluate_line(comparator, trimmed) {
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(editline::Error::Eof) => {
                // EOF (Ctrl-D)
                println!("\nGoodbye!");
                break;
            }
            Err(editline::Error::Interrupted) => {
                // Ctrl-C - just continue
                println!("^C");
                continue;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}
