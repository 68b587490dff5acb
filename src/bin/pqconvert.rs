// src/bin/pqconvert.rs
use anyhow::{Context, Result};
use argh::FromArgs;
use pqtttr::{
    parse_tag_stream, read_legacy_header, save_template, ConvertOptions, Converter, InputBuffer,
    PtuFile, PTU_MAGIC,
};
use std::io::{stdout, Write};
use std::path::PathBuf;

#[derive(Debug, FromArgs)]
/// Convert legacy PicoHarp TTTR files (.pt2/.pt3) into the tagged .ptu
/// format, inspect headers, and capture header templates.
struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    version: bool,
    #[argh(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
enum Command {
    Convert(ConvertArgs),
    Inspect(InspectArgs),
    Snapshot(SnapshotArgs),
}

#[derive(Debug, FromArgs)]
/// Convert a legacy file to .ptu using a header template.
#[argh(subcommand, name = "convert")]
struct ConvertArgs {
    /// legacy .pt2/.pt3 input file
    #[argh(positional)]
    input: PathBuf,
    /// header template: a JSON snapshot or a known-good .ptu file
    #[argh(option, short = 't')]
    template: PathBuf,
    /// output path (default: input with a .ptu extension)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
    /// JSON file with conversion options
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
    /// keep the serialized header and extracted payload next to the input
    #[argh(switch)]
    keep_intermediates: bool,
    /// print the decoded legacy header
    #[argh(switch, short = 'p')]
    print: bool,
}

#[derive(Debug, FromArgs)]
/// Print the header of a .ptu or legacy .pt2/.pt3 file.
#[argh(subcommand, name = "inspect")]
struct InspectArgs {
    /// file to inspect
    #[argh(positional)]
    input: PathBuf,
}

#[derive(Debug, FromArgs)]
/// Save the header of a .ptu file as a JSON template.
#[argh(subcommand, name = "snapshot")]
struct SnapshotArgs {
    /// known-good .ptu file
    #[argh(positional)]
    input: PathBuf,
    /// JSON template to write
    #[argh(positional)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: CliArgs = argh::from_env();
    if args.version {
        println!(concat!(env!("CARGO_BIN_NAME"), " ", env!("CARGO_PKG_VERSION")));
        return Ok(());
    }

    match args.command {
        Some(Command::Convert(c)) => convert(c),
        Some(Command::Inspect(i)) => inspect(i),
        Some(Command::Snapshot(s)) => snapshot(s),
        None => {
            eprintln!("no command given, see --help");
            Ok(())
        }
    }
}

fn convert(args: ConvertArgs) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => ConvertOptions::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConvertOptions::default(),
    };
    if args.output.is_some() {
        options.output = args.output.clone();
    }
    options.keep_intermediates |= args.keep_intermediates;

    let report = Converter::new(options)
        .convert(&args.input, &args.template)
        .with_context(|| format!("converting {}", args.input.display()))?;

    let stdout = stdout();
    let mut stdout = stdout.lock();
    if args.print {
        write!(stdout, "{}", report.legacy)?;
    }
    for path in &report.intermediates {
        writeln!(stdout, "Kept {}", path.display())?;
    }
    writeln!(
        stdout,
        "Converted {} to {}",
        report.input.display(),
        report.output.display()
    )?;
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let data = InputBuffer::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let stdout = stdout();
    let mut stdout = stdout.lock();

    if data.starts_with(PTU_MAGIC.as_bytes()) {
        let stream = parse_tag_stream(&data)?;
        writeln!(stdout, "{} {}", stream.magic, stream.version)?;
        write!(stdout, "{}", stream.tags)?;
        writeln!(stdout, "{} bytes of event records", data.len() - stream.header_len)?;
    } else {
        let (header, payload) = read_legacy_header(&data)?;
        write!(stdout, "{}", header)?;
        writeln!(stdout, "Mode {:?}, {} bytes of event records", header.mode, payload.len())?;
    }
    Ok(())
}

fn snapshot(args: SnapshotArgs) -> Result<()> {
    let file = PtuFile::open(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    save_template(file.tags(), &args.output)?;
    println!("Saved {} tags to {}", file.tags().len(), args.output.display());
    Ok(())
}
