//! Align a single sentence pair against a tiny in-memory lexicon and print
//! the derivation alongside the links.
//!
//! ```text
//! cargo run --example align_pair
//! ```

use itg_align::{Derivation, ItgParser, Lexicon};

fn print_tree(node: &Derivation, indent: usize) {
    let pad = "  ".repeat(indent);
    match node {
        Derivation::Leaf(span) => println!("{pad}leaf {span}"),
        Derivation::Truncated(span) => println!("{pad}truncated {span}"),
        Derivation::Internal {
            span,
            orientation,
            left,
            right,
        } => {
            println!("{pad}{orientation:?} {span}");
            print_tree(left, indent + 1);
            print_tree(right, indent + 1);
        }
    }
}

fn main() -> itg_align::Result<()> {
    let lexicon: Lexicon = [
        ("the", "der", -0.5),
        ("green", "grüne", -0.7),
        ("house", "haus", -0.4),
        ("house", "hause", -2.5),
        ("green", "grünen", -1.5),
    ]
    .into_iter()
    .collect();

    let mut parser = ItgParser::new(lexicon);
    let source = ["the", "house", "green"];
    let target = ["der", "grüne", "haus"];

    let outcome = parser.parse_detailed(&source, &target);
    println!("source: {source:?}");
    println!("target: {target:?}");
    println!("log score: {:.3}", outcome.log_score);
    if let Some(tree) = &outcome.derivation {
        print_tree(tree, 0);
    }
    println!("links:  {:?}", outcome.links);
    println!(
        "inverted rule usage: {:.2}",
        parser.fraction_inverted_rules()?
    );
    Ok(())
}
