use std::collections::BTreeSet;
use std::fmt;

use log::{debug, log_enabled, Level};
use thiserror::Error;

use crate::alignment::AlignmentPair;
use crate::inflection_table::InflectionTable;
use crate::knp::morpheme::{Morpheme, PARTICLE};
use crate::knp::ParsedSentence;
use crate::minimal_tree::{extract_minimal_tree, ExtractErr};

const BRACKETS: [&str; 2] = ["「", "」"];

#[derive(Error, Debug, PartialEq)]
pub enum CompressErr {
  #[error("coordinated phrases {0} and {1} cannot be merged")]
  UnusablePair(usize, usize),
  #[error("{0}")]
  ExtractErr(#[from] ExtractErr),
}

#[derive(Debug, Clone)]
pub struct SubstitutionParams {
  /// Minimum number of morphemes between two aligned words for them to be
  /// replaced by the headline particle.
  pub min_gap: usize,
}

impl Default for SubstitutionParams {
  fn default() -> SubstitutionParams {
    SubstitutionParams { min_gap: 2 }
  }
}

/// A compressed sentence and, for every emitted morpheme, its index in the
/// source sentence paired with its position in the compression.
#[derive(Debug, Clone, PartialEq)]
pub struct Compression {
  pub text: String,
  pub alignment: Vec<(usize, usize)>,
}

impl Compression {
  /// Number of emitted morphemes.
  pub fn len(&self) -> usize {
    self.alignment.len()
  }
  pub fn is_empty(&self) -> bool {
    self.alignment.is_empty()
  }
  pub fn alignment_string(&self) -> String {
    self
      .alignment
      .iter()
      .map(|(i, j)| format!("{}-{}", i, j))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl fmt::Display for Compression {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}\n{}", self.text, self.alignment_string())
  }
}

pub struct Compressor<'a> {
  sentence: &'a ParsedSentence,
  headline: &'a [Morpheme],
  inflection_table: &'a InflectionTable,
  params: &'a SubstitutionParams,
  /// Working copy of the sentence surfaces; the parsed sentence is never
  /// mutated.
  surfaces: Vec<String>,
}

impl<'a> Compressor<'a> {
  pub fn new(
    sentence: &'a ParsedSentence,
    headline: &'a [Morpheme],
    inflection_table: &'a InflectionTable,
    params: &'a SubstitutionParams,
  ) -> Compressor<'a> {
    Compressor {
      sentence,
      headline,
      inflection_table,
      params,
      surfaces: sentence.morphemes.iter().map(|m| m.surface.clone()).collect(),
    }
  }

  pub fn compress(mut self, pairs: &[AlignmentPair]) -> Result<Compression, CompressErr> {
    if log_enabled!(Level::Debug) {
      debug!("parsed sentence:\n{}", self.sentence);
    }
    let selected: Vec<usize> = pairs.iter().map(|p| p.sentence).collect();
    let basics = extract_minimal_tree(self.sentence, &selected)?;
    let phrases: BTreeSet<usize> = basics
      .iter()
      .map(|&b| self.sentence.phrase_of_basic(b))
      .collect();
    debug!("compressed phrases: {:?}", phrases);

    self.substitute_particles(pairs);
    let mut morphemes = self.merge_phrases(&phrases)?;
    trim_dangling(self.sentence, &mut morphemes);
    Ok(self.assemble(&morphemes))
  }

  /// Where two aligned headline words are joined by a particle and the
  /// corresponding sentence words are further apart, replaces what lies
  /// between them in the sentence with that particle.
  fn substitute_particles(&mut self, pairs: &[AlignmentPair]) {
    let headline_aligned: BTreeSet<usize> = pairs.iter().map(|p| p.headline).collect();
    let sentence_aligned: BTreeSet<usize> = pairs.iter().map(|p| p.sentence).collect();
    for pair in pairs {
      let (i, j) = (pair.headline, pair.sentence);
      if i + 2 >= self.headline.len()
        || !self.headline[i + 1].is_pos(PARTICLE)
        || !headline_aligned.contains(&(i + 2))
      {
        continue;
      }
      let k = match sentence_aligned.range(j + 1..).next() {
        Some(&k) => k,
        None => continue,
      };
      if self.sentence.morphemes[k].lemma != self.headline[i + 2].lemma {
        continue;
      }
      let linked = self.sentence.is_phrase_linked(
        self.sentence.phrase_of_morpheme(j),
        self.sentence.phrase_of_morpheme(k),
      );
      if !linked || k - j - 1 < self.params.min_gap {
        continue;
      }
      debug!(
        "substituting {}..{} with {}",
        j + 1,
        k,
        self.headline[i + 1].surface
      );
      for m in j + 1..k {
        self.surfaces[m].clear();
      }
      self.surfaces[j + 1] = self.headline[i + 1].surface.clone();
    }
  }

  /// Morpheme indices of the compressed phrases, with every coordinated
  /// phrase whose peer was dropped merged with the peer's ending.
  fn merge_phrases(&mut self, phrases: &BTreeSet<usize>) -> Result<Vec<usize>, CompressErr> {
    let sentence = self.sentence;
    let mut morphemes = vec![];
    for &i in phrases {
      let phrase = &sentence.phrases[i];
      let j = match phrase.target() {
        Some(j) if phrase.is_coordination() && !phrases.contains(&j) => j,
        _ => {
          morphemes.extend(phrase.morphemes.iter().cloned());
          continue;
        }
      };
      debug!("merging coordinated phrases {} and {}", i, j);
      let verbal = phrase
        .features
        .predicate_type()
        .map_or(false, |t| t.is_verbal_or_adjectival());
      if verbal {
        morphemes.extend(self.merge_predicates(i, j)?);
      } else {
        morphemes.extend(self.merge_nominals(i, j));
      }
    }
    Ok(morphemes)
  }

  /// Re-inflects the last inflectable word of `i` into the form of the last
  /// inflectable word of `j` and continues with what follows it in `j`.
  fn merge_predicates(&mut self, i: usize, j: usize) -> Result<Vec<usize>, CompressErr> {
    let sentence = self.sentence;
    let last_inflectable = |p: usize| {
      sentence.phrases[p]
        .morphemes
        .iter()
        .rev()
        .find(|&&m| sentence.morphemes[m].is_inflectable())
        .cloned()
    };
    let infl1 = last_inflectable(i).ok_or(CompressErr::UnusablePair(i, j))?;
    let infl2 = last_inflectable(j).ok_or(CompressErr::UnusablePair(i, j))?;
    let from = &sentence.morphemes[infl1];
    let to = &sentence.morphemes[infl2];
    let surface = self
      .inflection_table
      .reinflect(
        &self.surfaces[infl1],
        from.inflection_type_id,
        from.inflection_form_id,
        to.inflection_form_id,
      )
      .ok_or(CompressErr::UnusablePair(i, j))?;
    self.surfaces[infl1] = surface;

    let former = sentence.phrases[i].morphemes.iter().filter(|&&m| m <= infl1);
    let latter = sentence.phrases[j].morphemes.iter().filter(|&&m| m > infl2);
    Ok(former.chain(latter).cloned().collect())
  }

  /// Replaces the function-word tail of `i` with that of `j`.
  fn merge_nominals(&self, i: usize, j: usize) -> Vec<usize> {
    let sentence = self.sentence;
    let mut merged = sentence.phrases[i].morphemes.clone();
    while let Some(&m) = merged.last() {
      if !sentence.morphemes[m].is_functional_tail() {
        break;
      }
      merged.pop();
    }
    let tail: Vec<usize> = sentence.phrases[j]
      .morphemes
      .iter()
      .rev()
      .take_while(|&&m| sentence.morphemes[m].is_functional_tail())
      .cloned()
      .collect();
    merged.extend(tail.into_iter().rev());
    merged
  }

  fn assemble(&self, morphemes: &[usize]) -> Compression {
    let mut text = String::new();
    let mut alignment = vec![];
    for &m in morphemes {
      let surface = &self.surfaces[m];
      if surface.is_empty() || BRACKETS.contains(&surface.as_str()) {
        continue;
      }
      text.push_str(surface);
      alignment.push((m, alignment.len()));
    }
    Compression { text, alignment }
  }
}

/// Drops particles and special tokens from the end.
pub fn trim_dangling(sentence: &ParsedSentence, morphemes: &mut Vec<usize>) {
  while let Some(&m) = morphemes.last() {
    if !sentence.morphemes[m].is_dangling() {
      break;
    }
    morphemes.pop();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::alignment::{extract_open_classes, Aligner, ScoringParams};
  use crate::juman::decode_juman_output;
  use crate::test_utils::{
    AURORA_HEADLINE_JUMAN, AURORA_KNP, COORDINATED_NOUNS_KNP, COORDINATED_VERBS_KNP, KATUYOU,
  };
  use std::io::Cursor;

  fn table() -> InflectionTable {
    InflectionTable::from_katuyou_reader(Cursor::new(KATUYOU)).unwrap()
  }

  fn pair(headline: usize, sentence: usize) -> AlignmentPair {
    AlignmentPair {
      headline,
      sentence,
      score: 0.0,
    }
  }

  fn assert_positions(compression: &Compression) {
    for (n, &(_, j)) in compression.alignment.iter().enumerate() {
      assert_eq!(n, j);
    }
  }

  #[test]
  fn test_compress_aurora() {
    let sentence = ParsedSentence::parse(AURORA_KNP).unwrap();
    let headline = decode_juman_output(AURORA_HEADLINE_JUMAN).unwrap();
    let scoring = ScoringParams::default();
    let ocs = extract_open_classes(&headline);
    let pairs = Aligner::new(&sentence.morphemes, &headline, &scoring).align(&ocs);
    let table = table();
    let params = SubstitutionParams::default();
    let compression = Compressor::new(&sentence, &headline, &table, &params)
      .compress(&pairs)
      .unwrap();
    assert_eq!(
      "野口聡一宇宙飛行士らが国際宇宙で撮影したオーロラの写真を中心としたオーロラ展２０１１が５〜３１日、東京都新宿区新宿３のコニカミノルタプラザで開かれる",
      compression.text
    );
    assert_eq!(40, compression.len());
    assert!(compression.len() < sentence.morphemes.len());
    assert!(compression.text.chars().count() < sentence.surface().chars().count());
    assert_positions(&compression);
    assert_eq!((0, 0), compression.alignment[0]);
    assert_eq!((7, 7), compression.alignment[7]);
    assert_eq!((9, 8), compression.alignment[8]);
    assert_eq!(Some(&(46, 39)), compression.alignment.last());
    // the parsed sentence itself is left alone
    assert_eq!("ステーション", sentence.morphemes[7].surface);
  }

  #[test]
  fn test_substitution_needs_gap() {
    let sentence = ParsedSentence::parse(AURORA_KNP).unwrap();
    let headline = decode_juman_output(AURORA_HEADLINE_JUMAN).unwrap();
    let table = table();
    let params = SubstitutionParams { min_gap: 3 };
    let compression = Compressor::new(&sentence, &headline, &table, &params)
      .compress(&[pair(7, 6), pair(9, 9)])
      .unwrap();
    // 撮影 also brings its subject along
    assert_eq!(
      "野口聡一宇宙飛行士らが国際宇宙ステーションから撮影した",
      compression.text
    );
  }

  #[test]
  fn test_merge_coordinated_predicates() {
    let sentence = ParsedSentence::parse(COORDINATED_VERBS_KNP).unwrap();
    let table = table();
    let params = SubstitutionParams::default();
    let compression = Compressor::new(&sentence, &[], &table, &params)
      .compress(&[pair(0, 0)])
      .unwrap();
    assert_eq!("会見を開く", compression.text);
    assert_eq!(vec![(0, 0), (1, 1), (2, 2)], compression.alignment);
  }

  #[test]
  fn test_merge_coordinated_nominals() {
    let sentence = ParsedSentence::parse(COORDINATED_NOUNS_KNP).unwrap();
    let table = table();
    let params = SubstitutionParams::default();
    let compression = Compressor::new(&sentence, &[], &table, &params)
      .compress(&[pair(0, 0), pair(1, 4)])
      .unwrap();
    assert_eq!("東京で開催する", compression.text);
    assert_eq!(vec![(0, 0), (3, 1), (4, 2), (5, 3)], compression.alignment);
  }

  #[test]
  fn test_unusable_pair() {
    let sentence = ParsedSentence::parse(COORDINATED_VERBS_KNP).unwrap();
    let empty = InflectionTable::default();
    let params = SubstitutionParams::default();
    let result = Compressor::new(&sentence, &[], &empty, &params).compress(&[pair(0, 0)]);
    assert_eq!(Err(CompressErr::UnusablePair(1, 2)), result);
  }

  #[test]
  fn test_trim_is_idempotent() {
    let sentence = ParsedSentence::parse(COORDINATED_NOUNS_KNP).unwrap();
    let mut morphemes = vec![0, 1, 2, 3];
    trim_dangling(&sentence, &mut morphemes);
    assert_eq!(vec![0, 1, 2], morphemes);
    trim_dangling(&sentence, &mut morphemes);
    assert_eq!(vec![0, 1, 2], morphemes);
  }

  #[test]
  fn test_alignment_string() {
    let compression = Compression {
      text: String::from("東京で"),
      alignment: vec![(0, 0), (3, 1)],
    };
    assert_eq!("0-0 3-1", compression.alignment_string());
    assert_eq!("東京で\n0-0 3-1", compression.to_string());
  }
}
