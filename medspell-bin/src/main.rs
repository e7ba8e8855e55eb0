use std::io::{self, Read};
use std::path::PathBuf;

use gumdrop::Options;
use serde::Serialize;

use medspell::corrector::{Correction, Corrector, CorrectorConfig, Match};
use medspell::fuzzy::FuzzyLevel;
use medspell::vocabulary::source::DictionaryPaths;

trait OutputWriter {
    fn write_correction(&mut self, input: &str, correction: &Correction);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_correction(&mut self, input: &str, correction: &Correction) {
        println!(
            "Input: {}\t\t[{}]",
            input,
            if correction.matches.is_empty() {
                "UNCHANGED"
            } else {
                "CORRECTED"
            }
        );
        println!("Output: {}", correction.text);

        for m in &correction.matches {
            println!("{:>4}: {}\t\t{:.4}", m.offset, m.term, m.score);
        }
        println!();
    }

    fn finish(&mut self) {}
}

#[derive(Serialize)]
struct CorrectionRequest {
    input: String,
    text: String,
    matches: Vec<Match>,
}

#[derive(Serialize)]
struct JsonWriter {
    results: Vec<CorrectionRequest>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter { results: vec![] }
    }
}

impl OutputWriter for JsonWriter {
    fn write_correction(&mut self, input: &str, correction: &Correction) {
        self.results.push(CorrectionRequest {
            input: input.to_owned(),
            text: correction.text.clone(),
            matches: correction.matches.clone(),
        });
    }

    fn finish(&mut self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("{}", e),
        }
    }
}

fn run(corrector: &Corrector, inputs: Vec<String>, writer: &mut dyn OutputWriter) {
    for input in inputs {
        let correction = corrector.correct(&input);
        writer.write_correction(&input, &correction);
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "correct the provided lines of text")]
    Correct(CorrectArgs),

    #[options(help = "print the phonetic token sets of the input")]
    Tokenize(TokenizeArgs),
}

#[derive(Debug, Options)]
struct CorrectArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(short = "c", help = "JSON corrector configuration")]
    config: Option<PathBuf>,

    #[options(no_short, help = "`term \\t category` vocabulary file")]
    vocabulary: Option<PathBuf>,

    #[options(no_short, help = "custom terms, one per line")]
    custom: Option<PathBuf>,

    #[options(no_short, help = "terms that only match the whole input")]
    filter: Option<PathBuf>,

    #[options(no_short, help = "`bad \\t good` replacements applied before matching")]
    rules: Option<PathBuf>,

    #[options(no_short, help = "`syllable \\t initial \\t final` inventory")]
    syllables: Option<PathBuf>,

    #[options(no_short, help = "normal, moreFuzzy or moreStrict")]
    level: Option<FuzzyLevel>,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,

    #[options(free, help = "lines to be corrected")]
    inputs: Vec<String>,
}

#[derive(Debug, Options)]
struct TokenizeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(short = "e", long = "expand", help = "expand letters and digits into placeholders")]
    expand: bool,

    #[options(free, help = "text to be tokenized")]
    inputs: Vec<String>,
}

fn read_inputs(inputs: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !inputs.is_empty() {
        return Ok(inputs);
    }

    eprintln!("Reading from stdin...");
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer
        .lines()
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect())
}

fn tokenize(args: TokenizeArgs) -> anyhow::Result<()> {
    let corrector = Corrector::new(Default::default(), CorrectorConfig::default());

    for input in read_inputs(args.inputs)? {
        let expanded = corrector.tokenize(&input, args.expand);

        for (index, (ch, set)) in expanded.chars.iter().zip(&expanded.tokens).enumerate() {
            println!("{:>4}: {} {}", index, ch, set);
        }
    }

    Ok(())
}

fn correct(args: CorrectArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => CorrectorConfig::from_path(path)?,
        None => CorrectorConfig::default(),
    };

    if let Some(level) = args.level {
        config.fuzzy_level = level;
    }

    let paths = DictionaryPaths {
        vocabulary: args.vocabulary,
        custom: args.custom,
        filter_rules: args.filter,
        replacements: args.rules,
        syllables: args.syllables,
    };

    let corrector = Corrector::from_dictionaries(paths.load()?, config);

    let mut writer: Box<dyn OutputWriter> = if args.use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    };

    run(&corrector, read_inputs(args.inputs)?, &mut *writer);

    writer.finish();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Correct(args)) => correct(args),
        Some(Command::Tokenize(args)) => tokenize(args),
    }
}
