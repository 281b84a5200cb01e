//! Parses English-ish sentences with lookahead-classified words.
//!
//! Run with: cargo run --example quick_brown_fox

use relent::compile_parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let parser = compile_parser(
        "Sentence := 'The ' DescribedThing ' jumps over the ' DescribedThing '.' \
         DescribedThing := Adjective* Noun \
         Adjective := Word !(' jumps' || '.') \
         Noun := Word &(' jumps' || '.') \
         Word := /\\s*/ /[^\\s.]+/",
    )?;

    for sentence in [
        "The fox jumps over the dog.",
        "The quick brown fox jumps over the lazy dog.",
    ] {
        let tree = parser.parse(sentence)?;
        println!("{sentence}");
        println!("  -> {tree}");
    }

    Ok(())
}
