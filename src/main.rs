extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate term_grid;
extern crate regasm;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use regasm::assembler::{lexer, FileSource, ProgramRepr, SourceProvider};

use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tPrint Tokens: {}\n\tPrint Program: {}\n\tOutfile: {}\n\tInfile: {}",
        level_for(args.occurrences_of("verbose")),
        args.is_present("print-tokens"),
        args.is_present("print-debug"),
        args.value_of("output").unwrap_or("None"),
        args.value_of("INPUT").unwrap_or("None")
    );

    // INPUT is a required argument.
    let ifile = args.value_of("INPUT").unwrap_or_default();

    let text = match FileSource.load(ifile) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(text) => text,
    };

    let tokens = lexer::tokenize(&text);

    if args.is_present("print-tokens") {
        let mut grid = Grid::new(GridOptions {
            filling:     Filling::Spaces(1),
            direction:   Direction::LeftToRight,
        });

        for (idx, tok) in tokens.iter().enumerate() {
            grid.add(Cell::from(format!("{:04}:", idx)));
            grid.add(Cell::from(tok.lexeme.clone()));
            grid.add(Cell::from(format!("{:?}", tok.kind)));
        }

        println!("{}", grid.fit_into_columns(3));
    }

    let repr = match ProgramRepr::from_tokens(&tokens) {
        Err(err) => {
            error!("fatal: error decoding `{}`: {}", ifile, err);
            std::process::exit(1);
        },
        Ok(repr) => repr,
    };
    info!("decoded {} record(s) from {} token(s)", repr.len(), tokens.len());

    if args.is_present("print-debug") {
        let mut grid = Grid::new(GridOptions {
            filling:     Filling::Spaces(1),
            direction:   Direction::LeftToRight,
        });

        for (idx, ins) in repr.iter().enumerate() {
            grid.add(Cell::from(format!("{:04}:", idx)));
            grid.add(Cell::from(format!("{}", ins)));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(format!("{:?}", ins)));
        }

        println!("{}", grid.fit_into_columns(4));
    }

    if let Some(filename) = args.value_of("output") {
        let opath = Path::new(filename);

        let mut ofile = match File::create(&opath) {
            Err(err) => {
                error!("fatal: unable to open output file `{}`: {}", opath.display(), err);
                std::process::exit(1);
            },
            Ok(file) => file,
        };

        if let Err(err) = write!(ofile, "{}", repr) {
            error!("fatal: unable to write to output file `{}`: {}", opath.display(), err);
            std::process::exit(1);
        }
    }
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write the normalized listing to an outfile"))
        .arg(Arg::with_name("print-tokens")
            .short("t")
            .takes_value(false)
            .help("prints the token table to STDOUT"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the decoded program to STDOUT"))
        .get_matches()
}

fn level_for(verbosity: u64) -> log::LevelFilter {
    match verbosity {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level_for(verbosity))
        .chain(std::io::stdout())
        .apply().ok();
}
