use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

use super::case_analysis::CaseAnalysisErr;
use super::features::{decode_features, split_annotations, Features};

pub const NOUN: &str = "名詞";
pub const VERB: &str = "動詞";
pub const ADJECTIVE: &str = "形容詞";
pub const ADVERB: &str = "副詞";
pub const UNDEFINED: &str = "未定義語";
pub const PARTICLE: &str = "助詞";
pub const SUFFIX: &str = "接尾辞";
pub const SPECIAL: &str = "特殊";

const FIELDS_NUM: usize = 12;

#[derive(Error, Debug)]
pub enum MorphemeErr {
  #[error("invalid morpheme line `{0}`")]
  InvalidFormatErr(String),
  #[error("{0}")]
  ParseIntError(#[from] ParseIntError),
  #[error("{0}")]
  CaseAnalysisErr(#[from] CaseAnalysisErr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Morpheme {
  pub surface: String,
  pub pronunciation: String,
  pub lemma: String,
  pub pos: String,
  pub pos_id: u32,
  pub sub_pos: String,
  pub sub_pos_id: u32,
  pub inflection_type: String,
  pub inflection_type_id: u32,
  pub inflection_form: String,
  pub inflection_form_id: u32,
  pub extra: String,
  pub features: Features,
}

impl Morpheme {
  /// Decodes one tagger/parser morpheme line:
  /// `surface pron lemma pos pos_id sub_pos sub_pos_id type type_id form form_id extra <features>...`
  pub fn from_line(line: &str) -> Result<Morpheme, MorphemeErr> {
    let (head, tokens) = split_annotations(line);
    let cols: Vec<&str> = head.splitn(FIELDS_NUM, ' ').collect();
    if cols.len() < FIELDS_NUM - 1 {
      return Err(MorphemeErr::InvalidFormatErr(line.to_string()));
    }
    Ok(Morpheme {
      surface: cols[0].to_string(),
      pronunciation: cols[1].to_string(),
      lemma: cols[2].to_string(),
      pos: cols[3].to_string(),
      pos_id: cols[4].parse()?,
      sub_pos: cols[5].to_string(),
      sub_pos_id: cols[6].parse()?,
      inflection_type: cols[7].to_string(),
      inflection_type_id: cols[8].parse()?,
      inflection_form: cols[9].to_string(),
      inflection_form_id: cols[10].trim_end().parse()?,
      extra: cols.get(11).map(|s| s.trim().to_string()).unwrap_or_default(),
      features: decode_features(tokens)?,
    })
  }
  pub fn is_pos(&self, pos: &str) -> bool {
    self.pos == pos
  }
  pub fn is_inflectable(&self) -> bool {
    self.features.is_inflectable()
  }
  /// Particles, suffixes and special tokens: the function-word tail trimmed
  /// when two coordinated phrases are merged.
  pub fn is_functional_tail(&self) -> bool {
    self.pos == PARTICLE || self.pos == SUFFIX || self.pos == SPECIAL
  }
  /// Particles and special tokens: trimmed off the end of the compressed text.
  pub fn is_dangling(&self) -> bool {
    self.pos == PARTICLE || self.pos == SPECIAL
  }
}

impl fmt::Display for Morpheme {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{} {} {} {} {} {} {} {}",
      self.surface,
      self.pronunciation,
      self.lemma,
      self.pos,
      self.sub_pos,
      self.inflection_type,
      self.inflection_form,
      self.features
    )
  }
}
