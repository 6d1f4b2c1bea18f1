//! Checks a labeled corpus laid out as `<dir>/<digit>/<image>` against the classifier.

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use analog_meter_reader::logging::init_logging;
use analog_meter_reader::{DigitClassifier, NeedleChannel};

#[derive(Parser, Debug)]
#[command(name = "match_expected", about = "Compare dial readings with their labels", version)]
struct Cli {
    /// Corpus root with one sub-directory per digit
    dir: PathBuf,

    /// Needle colour channel: r, g or b
    #[arg(short, long, default_value = "r")]
    channel: String,
}

#[derive(Debug, Default)]
struct Tally {
    checked: usize,
    mismatched: Vec<(PathBuf, u8, String)>,
}

fn labeled_files(dir: &Path, digit: u8) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let sub = dir.join(digit.to_string());
    if !sub.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(&sub)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn check(dir: &Path, classifier: &DigitClassifier) -> Result<Tally, Box<dyn Error>> {
    let mut tally = Tally::default();
    for expected in 0..10u8 {
        for path in labeled_files(dir, expected)? {
            tally.checked += 1;
            match classifier.classify_path(&path) {
                Ok(digit) if digit == expected => {}
                Ok(digit) => tally.mismatched.push((path, expected, digit.to_string())),
                Err(e) => tally.mismatched.push((path, expected, format!("error: {e}"))),
            }
        }
    }
    Ok(tally)
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(false);

    let channel: NeedleChannel = cli.channel.parse()?;
    let tally = check(&cli.dir, &DigitClassifier::with_channel(channel))?;

    for (path, expected, got) in &tally.mismatched {
        println!("MISMATCH {}: expected {expected}, got {got}", path.display());
    }
    let matched = tally.checked - tally.mismatched.len();
    println!("{matched}/{} images matched their label", tally.checked);

    if tally.checked == 0 {
        eprintln!("No labeled images under {}", cli.dir.display());
        return Ok(ExitCode::FAILURE);
    }
    Ok(if tally.mismatched.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
