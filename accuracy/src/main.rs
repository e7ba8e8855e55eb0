use chrono::prelude::*;
use std::error::Error;
use std::{
    io::Write,
    path::Path,
    time::{Instant, SystemTime},
};

use distance::damerau_levenshtein;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use medspell::corrector::{Corrector, CorrectorConfig, Match};
use medspell::vocabulary::source::{load_vocabulary, Dictionaries};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::Serialize;
use structopt::clap::{App, AppSettings, Arg};

fn load_pairs(
    path: &str,
    max_lines: Option<usize>,
) -> Result<Vec<(String, String)>, Box<dyn Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    Ok(rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|r| {
            r.get(0)
                .and_then(|x| r.get(1).map(|y| (x.to_string(), y.to_string())))
        })
        .take(max_lines.unwrap_or(std::usize::MAX))
        .collect())
}

#[derive(Debug, Default, Serialize, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
struct Time {
    secs: u64,
    subsec_nanos: u32,
}

impl Time {
    fn from_duration(d: std::time::Duration) -> Time {
        Time {
            secs: d.as_secs(),
            subsec_nanos: d.subsec_nanos(),
        }
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let ms = self.secs * 1000 + (self.subsec_nanos as u64 / 1_000_000);
        write!(f, "{}ms", ms)
    }
}

#[derive(Debug, Serialize)]
struct AccuracyResult<'a> {
    input: &'a str,
    expected: &'a str,
    output: String,
    /// edit distance between input and expected text
    input_distance: usize,
    /// edit distance between output and expected text
    output_distance: usize,
    matches: Vec<Match>,
    time: Time,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    config: &'a CorrectorConfig,
    summary: Summary,
    results: Vec<AccuracyResult<'a>>,
    start_timestamp: Time,
    total_time: Time,
}

#[derive(Serialize, Default, Debug, Clone)]
struct Summary {
    total_lines: u32,
    exact: u32,
    already_correct: u32,
    missed: u32,
    wrong: u32,
    mean_input_distance: f32,
    mean_output_distance: f32,
    slowest_correction: Time,
    fastest_correction: Time,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        let percent =
            |v: u32| -> String { format!("{:.2}%", v as f32 / self.total_lines as f32 * 100f32) };

        write!(
            f,
            "[exact] {} [kept] {} [missed] {} [wrong] {} [dist] {:.3} -> {:.3} [fast] {} [slow] {}",
            percent(self.exact),
            percent(self.already_correct),
            percent(self.missed),
            percent(self.wrong),
            self.mean_input_distance,
            self.mean_output_distance,
            self.fastest_correction,
            self.slowest_correction
        )
    }
}

impl Summary {
    fn new(results: &[AccuracyResult<'_>]) -> Summary {
        let mut summary = Summary::default();
        let mut input_distance = 0;
        let mut output_distance = 0;

        results.iter().for_each(|result| {
            summary.total_lines += 1;
            input_distance += result.input_distance;
            output_distance += result.output_distance;

            if result.output == result.expected {
                summary.exact += 1;

                if result.matches.is_empty() {
                    summary.already_correct += 1;
                }
            } else if result.matches.is_empty() {
                summary.missed += 1;
            } else {
                summary.wrong += 1;
            }
        });

        if let Some(slowest) = results.iter().max_by(|x, y| x.time.cmp(&y.time)) {
            summary.slowest_correction = slowest.time;
        }
        if let Some(fastest) = results.iter().min_by(|x, y| x.time.cmp(&y.time)) {
            summary.fastest_correction = fastest.time;
        }

        if !results.is_empty() {
            summary.mean_input_distance = input_distance as f32 / results.len() as f32;
            summary.mean_output_distance = output_distance as f32 / results.len() as f32;
        }

        summary
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();

    let matches = App::new("medspell-accuracy")
        .setting(AppSettings::ArgRequiredElseHelp)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Accuracy testing for medspell.")
        .arg(
            Arg::with_name("config")
                .short("c")
                .takes_value(true)
                .help("Provide JSON config file to override test defaults"),
        )
        .arg(
            Arg::with_name("dictionary")
                .short("d")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("A `term \\t category` vocabulary file; may be repeated"),
        )
        .arg(
            Arg::with_name("words")
                .value_name("WORDS")
                .help("The 'input -> expected' list in tab-delimited value file (TSV)"),
        )
        .arg(
            Arg::with_name("json-output")
                .short("o")
                .value_name("JSON-OUTPUT")
                .help("The file path for the JSON report output"),
        )
        .arg(
            Arg::with_name("tsv-output")
                .short("t")
                .value_name("TSV-OUTPUT")
                .help("The file path for the TSV line append"),
        )
        .arg(
            Arg::with_name("max-lines")
                .short("w")
                .takes_value(true)
                .help("Truncate the list to the number of lines specified"),
        )
        .get_matches();

    let cfg: CorrectorConfig = match matches.value_of("config") {
        Some(path) => CorrectorConfig::from_path(Path::new(path))?,
        None => CorrectorConfig::default(),
    };

    let mut dictionaries = Dictionaries::default();
    for path in matches.values_of("dictionary").into_iter().flatten() {
        load_vocabulary(&mut dictionaries.vocabulary, Path::new(path))?;
    }

    if dictionaries.vocabulary.is_empty() && cfg.extra_terms.is_empty() {
        eprintln!("No vocabulary given; nothing can be corrected.");
    }

    let pairs = match matches.value_of("words") {
        Some(path) => load_pairs(
            path,
            matches
                .value_of("max-lines")
                .and_then(|x| x.parse::<usize>().ok()),
        )?,
        None => {
            eprintln!("No word list for given path; aborting.");
            std::process::exit(1);
        }
    };

    let corrector = Corrector::from_dictionaries(dictionaries, cfg.clone());

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{pos}/{len} [{percent}%] {wide_bar} {elapsed_precise}"),
    );

    let start_time = Instant::now();
    let results = pairs
        .par_iter()
        .progress_with(pb)
        .map(|(input, expected)| {
            let now = Instant::now();
            let correction = corrector.correct(input);
            let time = Time::from_duration(now.elapsed());

            AccuracyResult {
                input,
                expected,
                input_distance: damerau_levenshtein(input, expected),
                output_distance: damerau_levenshtein(&correction.text, expected),
                output: correction.text,
                matches: correction.matches,
                time,
            }
        })
        .collect::<Vec<_>>();

    let total_time = Time::from_duration(start_time.elapsed());
    let start_timestamp = Time::from_duration(
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default(),
    );

    let summary = Summary::new(&results);
    println!("{}", summary);

    if let Some(path) = matches.value_of("json-output") {
        let output = std::fs::File::create(path)?;
        let report = Report {
            config: &cfg,
            summary,
            results,
            start_timestamp,
            total_time,
        };
        println!("Writing JSON report…");
        serde_json::to_writer_pretty(output, &report)?;
    } else if let Some(path) = matches.value_of("tsv-output") {
        let mut output = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        if output.metadata()?.len() == 0 {
            // new file, write headers:
            output.write_all(b"date\tlines\texact\tkept\tmissed\twrong\tdistance\n")?;
        }
        writeln!(
            output,
            "{}\t{}\t{}\t{}\t{}\t{}\t{:.3}",
            Local::now().to_rfc3339(),
            summary.total_lines,
            summary.exact,
            summary.already_correct,
            summary.missed,
            summary.wrong,
            summary.mean_output_distance
        )?;
    };

    println!("Done!");
    Ok(())
}
