use std::collections::HashSet;

use log::{debug, info, warn};
use thiserror::Error;

use crate::alignment::{extract_open_classes, Aligner, ScoringParams};
use crate::analyzer::{Analyze, AnalyzerErr};
use crate::compressor::{CompressErr, Compression, Compressor, SubstitutionParams};
use crate::config::{Config, ConfigErr};
use crate::inflection_table::{InflectionTable, InflectionTableErr};
use crate::juman::decode_juman_output;
use crate::knp::morpheme::MorphemeErr;
use crate::knp::{KnpParseErr, ParsedSentence};
use crate::preprocess::{headline_segments, preprocess_sentence};

const SEGMENT_JOINER: &str = "　";

#[derive(Error, Debug)]
pub enum GrammarizeErr {
  #[error("{0}")]
  AnalyzerErr(#[from] AnalyzerErr),
  #[error("{0}")]
  MorphemeErr(#[from] MorphemeErr),
  #[error("{0}")]
  KnpParseErr(#[from] KnpParseErr),
  #[error("{0}")]
  CompressErr(#[from] CompressErr),
  #[error("{0}")]
  ConfigErr(#[from] ConfigErr),
  #[error("{0}")]
  InflectionTableErr(#[from] InflectionTableErr),
}

/// Rewrites a headline as a grammatical sentence cut out of the article's
/// first sentence.
pub struct Grammarizer<A: Analyze> {
  analyzer: A,
  inflection_table: InflectionTable,
  scoring: ScoringParams,
  substitution: SubstitutionParams,
  min_open_classes: usize,
  min_headline_morphemes: usize,
  separators: Vec<String>,
}

impl<A: Analyze> Grammarizer<A> {
  pub fn new(analyzer: A, inflection_table: InflectionTable) -> Grammarizer<A> {
    Grammarizer {
      analyzer,
      inflection_table,
      scoring: ScoringParams::default(),
      substitution: SubstitutionParams::default(),
      min_open_classes: 4,
      min_headline_morphemes: 6,
      separators: vec![String::from("　"), String::from("ーー")],
    }
  }
  pub fn from_config(
    analyzer: A,
    inflection_table: InflectionTable,
    config: &Config,
  ) -> Result<Grammarizer<A>, ConfigErr> {
    Ok(Grammarizer {
      analyzer,
      inflection_table,
      scoring: config.scoring_params()?,
      substitution: config.substitution_params()?,
      min_open_classes: config.min_open_classes()?,
      min_headline_morphemes: config.min_headline_morphemes()?,
      separators: config.headline_separators()?,
    })
  }
  /// Like `from_config`, loading the inflection table the settings name.
  pub fn setup(analyzer: A, config: &Config) -> Result<Grammarizer<A>, GrammarizeErr> {
    let path = config.inflection_table_path()?;
    let inflection_table = InflectionTable::from_json_path(&path)?;
    info!("loaded inflection table from {:?}", path);
    Ok(Grammarizer::from_config(analyzer, inflection_table, config)?)
  }

  /// `None` when no headline variant shares enough words with the sentence,
  /// or when the sentence cannot be compressed around them.
  pub fn grammarize(
    &mut self,
    headline: &str,
    sentence: &str,
  ) -> Result<Option<Compression>, GrammarizeErr> {
    let sentence_tagged = self.analyzer.tag(&preprocess_sentence(sentence))?;
    let sentence_morphemes = decode_juman_output(&sentence_tagged)?;
    let sentence_words: HashSet<String> = extract_open_classes(&sentence_morphemes)
      .into_iter()
      .collect();

    let mut segments = headline_segments(&preprocess_sentence(headline), &self.separators);
    while !segments.is_empty() {
      let variant = segments.join(SEGMENT_JOINER);
      let headline_morphemes = decode_juman_output(&self.analyzer.tag(&variant)?)?;
      if headline_morphemes.len() <= self.min_headline_morphemes {
        debug!("headline too short: {}", variant);
        return Ok(None);
      }
      let open_classes = extract_open_classes(&headline_morphemes);
      if open_classes.len() >= self.min_open_classes
        && open_classes.iter().all(|w| sentence_words.contains(w))
      {
        debug!("headline variant: {}", variant);
        let parsed = ParsedSentence::parse(&self.analyzer.parse(&sentence_tagged)?)?;
        let pairs =
          Aligner::new(&parsed.morphemes, &headline_morphemes, &self.scoring).align(&open_classes);
        let compressor = Compressor::new(
          &parsed,
          &headline_morphemes,
          &self.inflection_table,
          &self.substitution,
        );
        return match compressor.compress(&pairs) {
          Ok(compression) => Ok(Some(compression)),
          Err(CompressErr::UnusablePair(i, j)) => {
            warn!("unusable pair: phrases {} and {} of {}", i, j, parsed.surface());
            Ok(None)
          }
          Err(e) => Err(e.into()),
        };
      }
      segments.pop();
    }
    Ok(None)
  }
}
