//! Align a parallel corpus with an ITG biparser and report corpus statistics.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use itg_align::corpus::load_parallel;
use itg_align::{ExpansionPolicy, Grammar, ItgParserBuilder, Lexicon, Result as ItgResult};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Translation lexicon: `source \t target \t log-score` per line.
    #[arg(short = 'l', long, default_value = "data/itg.dict")]
    lexicon: PathBuf,

    /// Source sentences, one per line.
    #[arg(short = 's', long, default_value = "data/test.en")]
    source: PathBuf,

    /// Target sentences, one per line.
    #[arg(short = 't', long, default_value = "data/test.de")]
    target: PathBuf,

    /// Optional grammar file. It is loaded and validated but does not
    /// change the alignment.
    #[arg(short = 'g', long)]
    grammar: Option<PathBuf>,

    /// Disable inverted rules.
    #[arg(long, default_value_t = false)]
    no_inversion: bool,

    /// Deepest derivation the backtracer will follow.
    #[arg(long, default_value_t = itg_align::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Expand direct spans of width 3 instead of linking them whole.
    #[arg(long, default_value_t = false)]
    symmetric: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let lexicon = Lexicon::load(&args.lexicon)?;
    let pairs = load_parallel(&args.source, &args.target)?;
    log::info!(
        "loaded {} lexicon entries and {} sentence pairs",
        lexicon.len(),
        pairs.len()
    );

    let mut builder = ItgParserBuilder::new(lexicon)
        .with_inverted_rules(!args.no_inversion)
        .with_max_depth(args.max_depth);
    if args.symmetric {
        builder = builder.with_expansion(ExpansionPolicy::Symmetric);
    }
    if let Some(path) = &args.grammar {
        let grammar = Grammar::load(path)?;
        log::info!(
            "loaded {} grammar rules over {} symbols",
            grammar.len(),
            grammar.symbols().count()
        );
        builder = builder.with_grammar(grammar);
    }
    let mut parser = builder.build()?;

    for pair in &pairs {
        println!("Source sentence: {:?}", pair.source);
        println!("Target sentence: {:?}", pair.target);
        let links = parser.parse(&pair.source, &pair.target);
        println!("Alignment (source->target): {links:?}");
        println!();
    }

    println!(
        "Source words aligned to null: {}",
        percent(parser.fraction_source_null())
    );
    println!(
        "Target words aligned to null: {}",
        percent(parser.fraction_target_null())
    );
    println!(
        "Direct rule usage: {}",
        percent(parser.fraction_direct_rules())
    );
    println!(
        "Inverted rule usage: {}",
        percent(parser.fraction_inverted_rules())
    );
    Ok(())
}

fn percent(fraction: ItgResult<f64>) -> String {
    match fraction {
        Ok(value) => format!("{:.2}%", value * 100.0),
        Err(err) => {
            log::debug!("{err}");
            "n/a".to_string()
        }
    }
}
