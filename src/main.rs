use std::error::Error;
use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufWriter, Write};
use std::path::Path;
use std::process::exit;

use clap::{crate_name, crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{error, info};

use grammarize::analyzer::AnalyzerSession;
use grammarize::compressor::Compression;
use grammarize::config::Config;
use grammarize::corpus::CorpusReader;
use grammarize::grammarizer::Grammarizer;
use grammarize::inflection_table::InflectionTable;
use grammarize::preprocess::preprocess_sentence;
use grammarize::resources::write_grammarize_json;

// Subcommand names
const COMPRESS_SUB_CMD: &str = "compress";
const PAIR_SUB_CMD: &str = "pair";
const KATUYOU_SUB_CMD: &str = "katuyou";
const PREPROCESS_SUB_CMD: &str = "preprocess";
const SETTINGS_SUB_CMD: &str = "settings";

// Argument names
const FPATH_SETTING_ARG: &str = "fpath_setting";
const HEADLINE_ARG: &str = "headline";
const IN_FILE_ARG: &str = "in_file";
const IN_FILES_ARG: &str = "in_files";
const OUT_FILE_ARG: &str = "out_file";
const QUIET_ARG: &str = "quiet";
const SENTENCE_ARG: &str = "sentence";
const VERBOSE_ARG: &str = "verbose";

fn unwrap<T, E: Error>(t: Result<T, E>) -> T {
  match t {
    Ok(t) => t,
    Err(e) => {
      eprintln!("{}: error: {}", crate_name!(), e);
      exit(1);
    }
  }
}

fn setup_grammarizer(args: &ArgMatches) -> Grammarizer<AnalyzerSession> {
  let config = unwrap(Config::setup(args.value_of(FPATH_SETTING_ARG)));
  let session = unwrap(AnalyzerSession::setup(&config));
  unwrap(Grammarizer::setup(session, &config))
}

fn print_compression<W: Write>(
  writer: &mut W,
  headline: &str,
  sentence: &str,
  compression: &Compression,
) -> std::io::Result<()> {
  writeln!(writer, "{}", headline)?;
  writeln!(writer, "{}", sentence)?;
  writeln!(writer, "{}", compression.text)?;
  writeln!(writer, "{}", compression.alignment_string())?;
  writeln!(writer)
}

fn compress(args: &ArgMatches) {
  let mut grammarizer = setup_grammarizer(args);
  let out = stdout();
  let mut writer = BufWriter::new(out.lock());
  let paths: Vec<&str> = args.values_of(IN_FILES_ARG).map(|v| v.collect()).unwrap_or_default();
  for path in paths {
    info!("reading {}", path);
    for article in unwrap(CorpusReader::from_path(path)) {
      let article = match article {
        Ok(a) => a,
        Err(e) => {
          error!("{}: {}", path, e);
          break;
        }
      };
      let sentence = article.sentence.strip_prefix(' ').unwrap_or(&article.sentence);
      match grammarizer.grammarize(&article.title, sentence) {
        Ok(Some(compression)) => {
          unwrap(print_compression(&mut writer, &article.title, sentence, &compression));
        }
        Ok(None) => (),
        Err(e) => error!("{}: {}", article.title, e),
      }
    }
  }
  unwrap(writer.flush());
}

fn pair(args: &ArgMatches) {
  let mut grammarizer = setup_grammarizer(args);
  let headline = args.value_of(HEADLINE_ARG).unwrap_or_default();
  let sentence = args.value_of(SENTENCE_ARG).unwrap_or_default();
  let out = stdout();
  let mut writer = out.lock();
  match unwrap(grammarizer.grammarize(headline, sentence)) {
    Some(compression) => unwrap(print_compression(&mut writer, headline, sentence, &compression)),
    None => info!("no compression for `{}`", headline),
  }
}

fn katuyou(args: &ArgMatches) {
  let in_file = args.value_of(IN_FILE_ARG).unwrap_or_default();
  let table = unwrap(InflectionTable::from_katuyou_path(in_file));
  match args.value_of(OUT_FILE_ARG) {
    Some(out_file) => {
      let writer = BufWriter::new(unwrap(File::create(out_file)));
      unwrap(table.write_json(writer));
    }
    None => {
      let out = stdout();
      unwrap(table.write_json(out.lock()));
    }
  }
}

fn preprocess(_args: &ArgMatches) {
  let input = stdin();
  let out = stdout();
  let mut writer = BufWriter::new(out.lock());
  for line in input.lock().lines() {
    let line = unwrap(line);
    let line = line.strip_prefix(' ').unwrap_or(&line);
    unwrap(writeln!(writer, "{}", preprocess_sentence(line)));
  }
  unwrap(writer.flush());
}

fn settings(args: &ArgMatches) {
  let out_file = args.value_of(OUT_FILE_ARG).unwrap_or("grammarize.json");
  unwrap(write_grammarize_json(out_file));
}

fn file_validator(in_file: String) -> Result<(), String> {
  if Path::new(&in_file).is_file() {
    Ok(())
  } else {
    Err(format!(
      "{}: error: {} doesn't exist",
      crate_name!(),
      in_file
    ))
  }
}

fn setting_arg<'a, 'b>() -> Arg<'a, 'b> {
  Arg::with_name(FPATH_SETTING_ARG)
    .short("r")
    .takes_value(true)
    .help("the setting file in JSON format")
    .validator(file_validator)
}

fn main() {
  let compress_subcommand = SubCommand::with_name(COMPRESS_SUB_CMD)
    .about("Grammarize the headlines of news archives")
    .help_message("(default) see `compress -h`")
    .arg(setting_arg())
    .arg(
      Arg::with_name(IN_FILES_ARG)
        .takes_value(true)
        .multiple(true)
        .required(true)
        .help("news archives with <DOC>, <TITLE> and <TEXT> elements")
        .validator(file_validator),
    );

  let pair_subcommand = SubCommand::with_name(PAIR_SUB_CMD)
    .about("Grammarize a single headline")
    .help_message("see `pair -h`")
    .arg(setting_arg())
    .arg(
      Arg::with_name(HEADLINE_ARG)
        .required(true)
        .help("the headline"),
    )
    .arg(
      Arg::with_name(SENTENCE_ARG)
        .required(true)
        .help("the first sentence of the article"),
    );

  let katuyou_subcommand = SubCommand::with_name(KATUYOU_SUB_CMD)
    .about("Build the inflection table")
    .help_message("see `katuyou -h`")
    .arg(
      Arg::with_name(OUT_FILE_ARG)
        .short("o")
        .takes_value(true)
        .help("output file (default: stdout)"),
    )
    .arg(
      Arg::with_name(IN_FILE_ARG)
        .required(true)
        .help("JUMAN.katuyou")
        .validator(file_validator),
    );

  let preprocess_subcommand = SubCommand::with_name(PREPROCESS_SUB_CMD)
    .about("Normalize sentences read from stdin")
    .help_message("see `preprocess -h`");

  let settings_subcommand = SubCommand::with_name(SETTINGS_SUB_CMD)
    .about("Write the default setting file")
    .help_message("see `settings -h`")
    .arg(
      Arg::with_name(OUT_FILE_ARG)
        .short("o")
        .takes_value(true)
        .default_value("grammarize.json")
        .help("output file (default: grammarize.json)"),
    );

  let mut app = App::new("Japanese Headline Grammarizer")
    .version(crate_version!())
    .setting(AppSettings::VersionlessSubcommands)
    .arg(
      Arg::with_name(VERBOSE_ARG)
        .short("v")
        .multiple(true)
        .global(true)
        .help("increase logging verbosity"),
    )
    .arg(
      Arg::with_name(QUIET_ARG)
        .short("q")
        .global(true)
        .help("silence all logging"),
    )
    .subcommand(compress_subcommand)
    .subcommand(pair_subcommand)
    .subcommand(katuyou_subcommand)
    .subcommand(preprocess_subcommand)
    .subcommand(settings_subcommand);
  let matches = app.clone().get_matches();

  let (verbosity, quiet) = match matches.subcommand() {
    (_, Some(sub)) => (
      sub.occurrences_of(VERBOSE_ARG) as usize,
      sub.is_present(QUIET_ARG),
    ),
    _ => (0, false),
  };
  unwrap(
    stderrlog::new()
      .module(module_path!())
      .quiet(quiet)
      .verbosity(verbosity + 1)
      .init(),
  );

  match matches.subcommand() {
    (COMPRESS_SUB_CMD, Some(compress_matches)) => compress(compress_matches),
    (PAIR_SUB_CMD, Some(pair_matches)) => pair(pair_matches),
    (KATUYOU_SUB_CMD, Some(katuyou_matches)) => katuyou(katuyou_matches),
    (PREPROCESS_SUB_CMD, Some(preprocess_matches)) => preprocess(preprocess_matches),
    (SETTINGS_SUB_CMD, Some(settings_matches)) => settings(settings_matches),
    _ => {
      app.print_help().expect("Unable to write help");
      println!();
    }
  }
}
