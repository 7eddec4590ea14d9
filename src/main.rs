mod logging;

use std::env;
use std::path::{Path, PathBuf};

use textio_fs::{
    Encoding, FileReader, FileWriter, ReadFlags, ReaderConfig, WriteFlags, WriterConfig,
};

const USAGE: &str =
    "usage: textio <input> [output] [--read FLAGS] [--write FLAGS] [--from ENC] [--to ENC]";

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Options {
    input: PathBuf,
    output: PathBuf,
    read: ReadFlags,
    write: WriteFlags,
    from: Option<Encoding>,
    to: Option<Encoding>,
}

fn parse_args(args: &[String]) -> Result<Options, Box<dyn std::error::Error>> {
    let mut options = Options::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| format!("missing value for {}\n{}", name, USAGE))
        };
        match arg.as_str() {
            "--read" => options.read = ReadFlags::from_letters(value("--read")?)?,
            "--write" => options.write = WriteFlags::from_letters(value("--write")?)?,
            "--from" => options.from = Some(value("--from")?.parse()?),
            "--to" => options.to = Some(value("--to")?.parse()?),
            _ => positional.push(arg),
        }
    }

    match positional.as_slice() {
        [input] => options.input = PathBuf::from(input),
        [input, output] => {
            options.input = PathBuf::from(input);
            options.output = PathBuf::from(output);
        }
        _ => return Err(USAGE.into()),
    }
    let to_stream = options.output.as_os_str().is_empty() || options.output == Path::new("-");
    if to_stream && !options.write.default_stderr {
        options.write.default_stdout = true;
    }
    Ok(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args)?;
    log::debug!("{:?}", options);

    let reader = FileReader::open_with_config(
        &options.input,
        &ReaderConfig {
            flags: options.read,
            encoding: options.from,
            ..ReaderConfig::default()
        },
    )?;
    let writer = FileWriter::create_with_config(
        &options.output,
        &WriterConfig {
            flags: options.write,
            encoding: options.to,
        },
    )?;

    let mut count = 0u64;
    for line in reader {
        writer.write(&line?)?;
        count += 1;
    }
    writer.flush()?;
    log::info!("copied {} lines to {}", count, writer.path().display());

    Ok(())
}
