//! Comment Density Analyzer
//!
//! Walks the `src` folder of the current project, classifies every non-blank
//! line of the JavaScript sources (`.js`, `.jsx`) as code, comment, or
//! documentation, and prints a summary with percentages (German labels).
//!
//! The classifier is a single-pass state machine with one boolean of block
//! state per file; nothing is shared across files and nothing is persisted.

use clap::Parser;
use std::env;
use std::ffi::OsString;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use colored::*;

/// Folder analysed on every run, resolved against the current working
/// directory. Deliberately not configurable.
const SOURCE_DIR: &str = "src";

/// Recognized source file suffixes: the scripting language and its
/// component variant. Matching is case-sensitive.
const SOURCE_EXTENSIONS: [&str; 2] = [".js", ".jsx"];

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Comment density analyser for JavaScript source trees",
    long_about = "Scans the 'src' folder recursively, classifies each non-blank line of the \
                  .js/.jsx files as code, comment or documentation, and reports totals and \
                  percentages. The target folder and extensions are fixed."
)]
struct Args {
    /// Print per-file counts while scanning.
    #[arg(short, long)]
    verbose: bool,

    /// Only treat a `*/` line as a block end when a block is actually open.
    #[arg(long)]
    strict_close: bool,
}

impl Args {
    fn close_rule(&self) -> CloseMarkerRule {
        if self.strict_close {
            CloseMarkerRule::Strict
        } else {
            CloseMarkerRule::Lenient
        }
    }
}

/// How a `*/` line is handled when no block comment is open.
///
/// The original counter ended a block on any line starting with `*/`, even
/// when no block was open: a stray close marker counts as a comment line and
/// clears the block state unconditionally. `Lenient` keeps that behavior so
/// results stay comparable across runs; `Strict` requires a matching open,
/// letting a stray `*/` line fall through to the later branches instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseMarkerRule {
    Lenient,
    Strict,
}

/// Per-file (and aggregated) line classification counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct LineCounts {
    code_lines: u64,
    comment_lines: u64,
    doc_lines: u64,
}

impl LineCounts {
    fn total(&self) -> u64 {
        self.code_lines + self.comment_lines + self.doc_lines
    }

    fn add(&mut self, other: LineCounts) {
        self.code_lines += other.code_lines;
        self.comment_lines += other.comment_lines;
        self.doc_lines += other.doc_lines;
    }
}

/// Classified-line sums over the whole folder walk.
#[derive(Debug, Default, Clone, Copy)]
struct FolderTotals {
    counts: LineCounts,
    files_scanned: u64,
}

/// Reads a file's content as lines, requiring valid UTF-8. A decoding
/// failure surfaces as `InvalidData` and aborts the whole run.
struct StrictLineReader {
    reader: BufReader<Box<dyn Read + Send>>,
    buffer: Vec<u8>,
}

impl StrictLineReader {
    fn open(file_path: &Path) -> io::Result<Self> {
        let file = fs::File::open(file_path)?;
        Ok(Self::from_reader(Box::new(file)))
    }

    fn from_reader(reader: Box<dyn Read + Send>) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: Vec::with_capacity(8 * 1024),
        }
    }

    #[cfg(test)]
    fn with_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::from_reader(Box::new(reader))
    }
}

impl Iterator for StrictLineReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => match std::str::from_utf8(&self.buffer) {
                Ok(text) => {
                    let line = text.trim_end_matches(['\n', '\r']).to_string();
                    Some(Ok(line))
                }
                Err(err) => Some(Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid UTF-8 sequence: {}", err),
                ))),
            },
            Err(err) => Some(Err(err)),
        }
    }
}

/// Classify every line delivered by `reader`.
///
/// Branch order matters and is load-bearing: a line inside an open block is
/// always a comment, so leading-`*` continuation lines count as
/// documentation only while no block is open. Blank lines outside a block
/// are skipped entirely; blank lines inside a block count as comment like
/// the rest of the block body.
fn classify_lines(reader: StrictLineReader, rule: CloseMarkerRule) -> io::Result<LineCounts> {
    let mut counts = LineCounts::default();
    let mut in_block = false;
    for line_result in reader {
        let line = line_result?;
        let trimmed = line.trim();
        if !in_block && trimmed.starts_with("/*") {
            counts.comment_lines += 1;
            in_block = true;
        } else if trimmed.starts_with("*/") && (in_block || rule == CloseMarkerRule::Lenient) {
            counts.comment_lines += 1;
            in_block = false;
        } else if trimmed.starts_with("//") || in_block {
            counts.comment_lines += 1;
        } else if trimmed.is_empty() {
            continue;
        } else if trimmed.starts_with('*') {
            counts.doc_lines += 1;
        } else {
            counts.code_lines += 1;
        }
    }
    Ok(counts)
}

/// Open a source file and classify its lines. Pure function of the file
/// content; the block state never leaks across calls.
fn count_source_lines(file_path: &Path, rule: CloseMarkerRule) -> io::Result<LineCounts> {
    classify_lines(StrictLineReader::open(file_path)?, rule)
}

fn has_source_extension(file_name: &str) -> bool {
    SOURCE_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

fn safe_percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64) * 100.0
    }
}

/// Walk `path` recursively and sum the classification counts of every
/// matching source file. Symlinks are skipped; files without a recognized
/// suffix are ignored without comment. Any I/O or decoding error aborts the
/// walk and propagates to the caller.
fn scan_directory(path: &Path, args: &Args) -> io::Result<FolderTotals> {
    let mut totals = FolderTotals::default();
    for entry_result in fs::read_dir(path)? {
        let entry = entry_result?;
        let file_type = entry.file_type()?;
        let entry_path = entry.path();
        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            let sub_totals = scan_directory(&entry_path, args)?;
            totals.counts.add(sub_totals.counts);
            totals.files_scanned += sub_totals.files_scanned;
        } else if file_type.is_file() {
            let Some(file_name) = entry_path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !has_source_extension(file_name) {
                continue;
            }
            let counts = count_source_lines(&entry_path, args.close_rule())?;
            if args.verbose {
                println!("Datei: {}", entry_path.display());
                println!("  Codezeilen: {}", counts.code_lines);
                println!("  Kommentarzeilen: {}", counts.comment_lines);
                println!("  Dokumentationszeilen: {}", counts.doc_lines);
                println!();
            }
            totals.counts.add(counts);
            totals.files_scanned += 1;
        }
    }
    Ok(totals)
}

fn build_report(totals: &FolderTotals) -> String {
    let counts = totals.counts;
    let total = counts.total();
    let mut output = String::new();
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "{}",
        format!("Statistik für den Ordner '{}':", SOURCE_DIR)
            .blue()
            .bold()
    );
    if total == 0 {
        let _ = writeln!(output, "Keine passenden Quelldateien gefunden.");
        return output;
    }
    let _ = writeln!(
        output,
        "Gesamtanzahl Zeilen:  {}",
        total.to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "Codezeilen:  {} ({})",
        counts.code_lines.to_string().bright_yellow(),
        format!("{:.2}%", safe_percentage(counts.code_lines, total)).bright_yellow()
    );
    let _ = writeln!(
        output,
        "Kommentarzeilen:  {} ({})",
        counts.comment_lines.to_string().bright_yellow(),
        format!("{:.2}%", safe_percentage(counts.comment_lines, total)).bright_yellow()
    );
    let _ = writeln!(
        output,
        "Dokumentationszeilen:  {} ({})",
        counts.doc_lines.to_string().bright_yellow(),
        format!("{:.2}%", safe_percentage(counts.doc_lines, total)).bright_yellow()
    );
    output
}

fn main() -> io::Result<()> {
    run_with_args(env::args_os())
}

fn run_with_args<I, T>(args: I) -> io::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::parse_from(args);
    run_cli(&args)
}

fn run_cli(args: &Args) -> io::Result<()> {
    let root = Path::new(SOURCE_DIR);
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Ordner '{}' nicht gefunden", SOURCE_DIR),
        ));
    }

    let totals = scan_directory(root, args)?;
    if args.verbose {
        println!("Analysierte Dateien: {}", totals.files_scanned);
    }
    print!("{}", build_report(&totals));
    Ok(())
}
