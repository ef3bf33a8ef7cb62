use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser as ClapParser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use vtt2srt::{ConvertOpts, ProcessOpts};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("An error occurred: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("    {}", cause);
        }
        std::process::exit(1);
    }
}

#[derive(ClapParser)]
#[command(about = "Convert WebVTT captions into SRT subtitles", version)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to read from. If not supplied, the captions will be read from standard input.",
        default_value = "-"
    )]
    input: String,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. Defaults to standard output when reading standard input, \
                and to the input file with an .srt extension otherwise. Use '-' for standard output."
    )]
    output: Option<String>,
    #[arg(long, help = "Remove inline WebVTT markup such as karaoke timestamps and class spans.")]
    strip_tags: bool,
    #[arg(long, help = "Fail instead of silently dropping blocks that are not usable cues.")]
    strict: bool,
    #[arg(long, help = "Delete the input file after the subtitles have been written.")]
    remove_source: bool,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (repeatable).")]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

enum Destination {
    Stdout,
    File(PathBuf),
}

fn run(cli: Cli) -> Result<()> {
    let opts = ConvertOpts {
        process: ProcessOpts {
            strip_tags: cli.strip_tags,
        },
        strict: cli.strict,
        remove_source: cli.remove_source,
    };

    let source = match cli.input.as_str() {
        "-" => None,
        path => Some(PathBuf::from(path)),
    };
    let destination = match (cli.output.as_deref(), &source) {
        (Some("-"), _) | (None, None) => Destination::Stdout,
        (Some(path), _) => Destination::File(PathBuf::from(path)),
        (None, Some(input)) => Destination::File(vtt2srt::srt_path(input)),
    };

    match (source, destination) {
        (Some(input), Destination::File(output)) => {
            let (output, conv) = vtt2srt::convert_file(&input, Some(&output), &opts)
                .with_context(|| format!("Failed to convert '{}'", input.display()))?;
            report(&conv);
            debug!(output = %output.display(), "done");
        }
        (source, destination) => {
            if opts.remove_source && source.is_none() {
                return Err(anyhow!("--remove-source needs an input file, not standard input."));
            }
            let data = read_input(source.as_deref())?;
            let conv = vtt2srt::convert_with(&data, &opts.process);
            let conv = if opts.strict { conv.strict()? } else { conv };
            write_output(&destination, &conv.srt)?;
            report(&conv);

            if let Some(input) = source.filter(|_| opts.remove_source) {
                std::fs::remove_file(&input)
                    .context(format!("Failed to remove input file: '{}'", input.display()))?;
            }
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
        Some(path) => std::fs::read_to_string(path)
            .context(format!("Failed to open input file: '{}'", path.display())),
    }
}

fn write_output(destination: &Destination, srt: &str) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut dst = io::stdout().lock();
            dst.write_all(srt.as_bytes())
                .and_then(|_| dst.flush())
                .context("Failed to write to stdout")
        }
        Destination::File(path) => std::fs::write(path, srt)
            .context(format!("Failed to write output file: '{}'", path.display())),
    }
}

fn report(conv: &vtt2srt::Conversion) {
    if conv.cue_count == 0 {
        warn!("no usable cues found; the output is empty");
    }
    if !conv.is_lossless() {
        warn!(
            dropped = conv.skipped.len(),
            "some blocks were not usable cues and were left out (rerun with -vv for details)"
        );
    }
}
