mod cli;

use std::path::{Path, PathBuf};

use clap::Parser;
use hitrace_convert::convert_capture;
use hitrace_convert::textmode::rewrite_text_trace;

fn main() {
    env_logger::init();

    let opt = cli::Opt::parse();
    if let Some(dir) = &opt.dir {
        convert_directory(dir);
        return;
    }

    // clap guarantees out_file is present outside of -d mode.
    let out_file = opt.out_file.as_deref().unwrap();
    if let Some(text_file) = &opt.text_file {
        match rewrite_text_trace(text_file, out_file) {
            Ok(rewritten) => eprintln!("rewrote {rewritten} mark lines"),
            Err(err) => {
                eprintln!("Could not convert {}: {}", text_file.display(), err);
                std::process::exit(1);
            }
        }
    } else if let Some(binary_file) = &opt.binary_file {
        if !convert_one_capture(binary_file, out_file) {
            std::process::exit(1);
        }
    }
}

fn convert_one_capture(input: &Path, output: &Path) -> bool {
    match convert_capture(input, output) {
        Ok(summary) => {
            eprintln!("{} -> {}", input.display(), output.display());
            let _ = summary.write_report(&mut std::io::stderr().lock());
            true
        }
        Err(err) => {
            eprintln!("Could not convert {}: {}", input.display(), err);
            false
        }
    }
}

/// Batch mode: every file under `dir` whose name contains ".sys" is
/// converted next to itself, with the extension replaced by ".ftrace".
fn convert_directory(dir: &Path) {
    let mut captures = Vec::new();
    collect_captures(dir, &mut captures);
    if captures.is_empty() {
        eprintln!("No .sys captures found under {}", dir.display());
        return;
    }

    let mut ok = true;
    for input in &captures {
        let output = input.with_extension("ftrace");
        ok &= convert_one_capture(input, &output);
    }
    if !ok {
        std::process::exit(1);
    }
}

fn collect_captures(dir: &Path, captures: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("Could not read directory {}: {}", dir.display(), err);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_captures(&path, captures);
        } else if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.contains(".sys"))
        {
            captures.push(path);
        }
    }
}
