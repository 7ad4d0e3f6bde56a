use std::{
    fs::File,
    io::{stdin, stdout, BufWriter, Read, Write},
};

use clap::{App, Arg};

use stylet::{from_path, from_string, Options, OutputStyle};

fn main() -> std::io::Result<()> {
    let matches = App::new("stylet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("CSS preprocessor in rust")
        .arg(
            Arg::with_name("COMPRESS")
                .short("C")
                .long("compress")
                .help("Compress the CSS output"),
        )
        .arg(
            Arg::with_name("COMPARE")
                .short("d")
                .long("compare")
                .help("Print the input above the output, for debugging"),
        )
        .arg(
            Arg::with_name("INCLUDE")
                .short("I")
                .long("include")
                .help("A path to use when resolving imports. May be passed multiple times.")
                .multiple(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("WARN")
                .short("w")
                .long("warn")
                .help("Emit warnings for duplicate or shadowing definitions"),
        )
        .arg(Arg::with_name("INPUT").help("Source file, read from stdin when omitted"))
        .arg(Arg::with_name("OUTPUT").help("Output CSS file, written to stdout when omitted"))
        .get_matches();

    let mut options = Options::default().warn(matches.is_present("WARN"));
    if matches.is_present("COMPRESS") {
        options = options.style(OutputStyle::Compressed);
    }
    if let Some(paths) = matches.values_of("INCLUDE") {
        for path in paths {
            options = options.load_path(path);
        }
    }

    let (input, result) = match matches.value_of("INPUT") {
        Some(name) => (None, from_path(name, &options)),
        None => {
            let mut source = String::new();
            stdin().read_to_string(&mut source)?;
            (Some(source.clone()), from_string(source, &options))
        }
    };

    let css = result.unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1)
    });

    let mut out = String::new();
    if matches.is_present("COMPARE") {
        if let Some(input) = input {
            out.push_str(&input);
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out.push_str(&css);

    match matches.value_of("OUTPUT") {
        Some(path) => {
            let mut buf = BufWriter::new(File::create(path)?);
            buf.write_all(out.as_bytes())?;
        }
        None => {
            let mut buf = BufWriter::new(stdout());
            buf.write_all(out.as_bytes())?;
        }
    }
    Ok(())
}
