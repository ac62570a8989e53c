use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "hitrace-convert",
    version,
    about = r#"
hitrace-convert turns binary trace captures into systrace/ftrace text.

EXAMPLES:
    # Convert one binary capture:
    hitrace-convert -b record_trace.sys -o record_trace.ftrace

    # Fix up an already-textual capture:
    hitrace-convert -t record_trace.htrace -o record_trace.systrace

    # Convert every capture in a directory:
    hitrace-convert -d ./captures
"#,
    group(ArgGroup::new("input").required(true).args(["text_file", "binary_file", "dir"]))
)]
pub struct Opt {
    /// Text-format trace file to run through the legacy line rewriter.
    #[arg(short = 't', long = "text-file", value_name = "FILE")]
    pub text_file: Option<PathBuf>,

    /// Binary capture file to convert.
    #[arg(short = 'b', long = "binary-file", value_name = "FILE")]
    pub binary_file: Option<PathBuf>,

    /// Output file name.
    #[arg(
        short = 'o',
        long = "out-file",
        value_name = "FILE",
        required_unless_present = "dir",
        conflicts_with = "dir"
    )]
    pub out_file: Option<PathBuf>,

    /// Convert every file whose name contains ".sys" under this directory,
    /// writing each result next to its input with the extension replaced
    /// by ".ftrace".
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_mode_needs_an_output() {
        assert!(Opt::try_parse_from(["hitrace-convert", "-b", "in.sys"]).is_err());
        assert!(Opt::try_parse_from(["hitrace-convert", "-b", "in.sys", "-o", "out"]).is_ok());
    }

    #[test]
    fn text_and_binary_are_exclusive() {
        assert!(Opt::try_parse_from([
            "hitrace-convert",
            "-t",
            "a",
            "-b",
            "b",
            "-o",
            "out"
        ])
        .is_err());
    }

    #[test]
    fn dir_mode_stands_alone() {
        assert!(Opt::try_parse_from(["hitrace-convert", "-d", "captures"]).is_ok());
        assert!(Opt::try_parse_from(["hitrace-convert"]).is_err());
    }
}
