//! Shows what the engine hands back when input does not conform: the
//! furthest-progressing tree, annotated with `missing` and `lenient` tokens
//! at each recovery point.
//!
//! Run with: cargo run --example forgiving_parse

use relent::compile_parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let parser = compile_parser(
        "Assignment := Name '=' Value ';' \
         Name := /[a-z]+/ \
         Value := /[0-9]+/",
    )?;

    // Conforming input parses cleanly.
    let tree = parser.parse("answer=42;")?;
    println!("clean: {tree}");

    // The '=' is missing; recovery synthesizes it and resynchronizes on the
    // value, so the whole statement still comes back as one tree.
    match parser.parse("answer 42;") {
        Ok(_) => unreachable!("the input does not conform"),
        Err(error) => {
            println!("recovered (failed at offset {}):", error.furthest_offset);
            println!("  {}", error.best_parse);
        }
    }

    Ok(())
}
