//! Interactive CSV picker.
//!
//! Used when no `-f/--file` was given: lists `*.csv` files below the working
//! directory and lets the user choose one by number or type a path.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// How deep below the working directory to look for CSV files.
const SEARCH_DEPTH: usize = 3;

const SKIP_DIRS: &[&str] = &[".git", "target", "node_modules"];

/// Use `file` when given, otherwise ask on stdin.
pub fn resolve_csv_path(file: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match file {
        Some(path) => validate_csv_path(&path),
        None => prompt_for_csv_path(Path::new("."), &mut io::stdin().lock()),
    }
}

/// List CSV files under `root` and read a choice from `input`.
///
/// Accepts a list number or an explicit path; `q` cancels.
pub fn prompt_for_csv_path<R: BufRead>(root: &Path, input: &mut R) -> Result<PathBuf, AppError> {
    let files = find_csv_files(root, SEARCH_DEPTH);
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found here. Pass one with `-f <sales.csv>` or create one with `salescast sample > sales.csv`.",
        ));
    }

    println!("Sales files:");
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, display_relative(path, root));
    }

    let mut line = String::new();
    loop {
        print!("Pick 1-{} or enter a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if read == 0 {
            return Err(AppError::new(2, "No file chosen. Pass one with `-f <sales.csv>`."));
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = answer.parse::<usize>() {
            match files.get(choice.wrapping_sub(1)) {
                Some(path) => return validate_csv_path(path),
                None => {
                    println!("No file #{choice}.");
                    continue;
                }
            }
        }

        match validate_csv_path(Path::new(answer)) {
            Ok(path) => return Ok(path),
            Err(err) => println!("{err}"),
        }
    }
}

/// Check that `path` is an existing `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file, got: {}", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// CSV files under `root`, sorted by path.
pub fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, max_depth, &mut out);
    out.sort();
    out
}

fn walk(dir: &Path, depth_left: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            let name = entry.file_name();
            let skip = SKIP_DIRS.iter().any(|s| name.to_str() == Some(*s));
            if depth_left > 0 && !skip {
                walk(&path, depth_left - 1, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
