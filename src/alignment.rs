use std::cmp::Ordering;
use std::collections::HashSet;

use log::debug;

use crate::knp::morpheme::{Morpheme, ADJECTIVE, ADVERB, NOUN, UNDEFINED, VERB};

const MIN_UNDEFINED_LENGTH: usize = 2;

/// Nouns, adjectives, adverbs, verbs, and unknown words of two or more characters.
pub fn is_open_class(morpheme: &Morpheme) -> bool {
  match morpheme.pos.as_str() {
    NOUN | ADJECTIVE | ADVERB | VERB => true,
    UNDEFINED => morpheme.surface.chars().count() >= MIN_UNDEFINED_LENGTH,
    _ => false,
  }
}

/// Lemmas of the open-class morphemes, in order.
pub fn extract_open_classes(morphemes: &[Morpheme]) -> Vec<String> {
  morphemes
    .iter()
    .filter(|m| is_open_class(m))
    .map(|m| m.lemma.clone())
    .collect()
}

#[derive(Debug, Clone)]
pub struct ScoringParams {
  /// Offsets `-window..=window` are compared around a candidate pair.
  pub window: usize,
  pub punctuation_lemma: String,
  /// What a matching punctuation token adds to a run of matches.
  pub punctuation_weight: f64,
}

impl Default for ScoringParams {
  fn default() -> ScoringParams {
    ScoringParams {
      window: 2,
      punctuation_lemma: String::from("、"),
      punctuation_weight: 0.1,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentPair {
  pub headline: usize,
  pub sentence: usize,
  pub score: f64,
}

pub struct Aligner<'a> {
  sentence: &'a [Morpheme],
  headline: &'a [Morpheme],
  params: &'a ScoringParams,
}

impl<'a> Aligner<'a> {
  pub fn new(
    sentence: &'a [Morpheme],
    headline: &'a [Morpheme],
    params: &'a ScoringParams,
  ) -> Aligner<'a> {
    Aligner {
      sentence,
      headline,
      params,
    }
  }

  /// Scores every (headline, sentence) occurrence pair sharing one of
  /// `open_classes` and greedily keeps the best pairs so that no index is
  /// used twice.
  pub fn align(&self, open_classes: &[String]) -> Vec<AlignmentPair> {
    let mut lemmas: Vec<&str> = vec![];
    for oc in open_classes {
      if !lemmas.contains(&oc.as_str()) {
        lemmas.push(oc);
      }
    }
    let groups: Vec<(Vec<usize>, Vec<usize>)> = lemmas
      .iter()
      .map(|&lemma| {
        (
          positions(self.headline, lemma),
          positions(self.sentence, lemma),
        )
      })
      .collect();
    let mut headline_ocs: Vec<usize> = groups.iter().flat_map(|(h, _)| h.clone()).collect();
    headline_ocs.sort_unstable();
    let mut sentence_ocs: Vec<usize> = groups.iter().flat_map(|(_, s)| s.clone()).collect();
    sentence_ocs.sort_unstable();

    let mut candidates = vec![];
    for (its, iss) in &groups {
      for &i in its {
        for &j in iss {
          let score = self.local_score(i, j) + self.oc_score(i, j, &headline_ocs, &sentence_ocs);
          candidates.push(AlignmentPair {
            headline: i,
            sentence: j,
            score,
          });
        }
      }
    }
    // stable: ties keep enumeration order
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut used_headline = HashSet::new();
    let mut used_sentence = HashSet::new();
    let mut pairs = vec![];
    for pair in candidates {
      if used_headline.contains(&pair.headline) || used_sentence.contains(&pair.sentence) {
        continue;
      }
      debug!(
        "aligned {}:{} -> {} ({:.3})",
        pair.headline, self.headline[pair.headline].lemma, pair.sentence, pair.score
      );
      used_headline.insert(pair.headline);
      used_sentence.insert(pair.sentence);
      pairs.push(pair);
    }
    pairs
  }

  /// Longest run of matching lemmas through the window around `(i, j)`, minus one.
  fn local_score(&self, i: usize, j: usize) -> f64 {
    let window = self.params.window as isize;
    let mut count = 0.0;
    let mut score: f64 = 0.0;
    for o in -window..=window {
      let io = i as isize + o;
      let jo = j as isize + o;
      if io < 0
        || io as usize >= self.headline.len()
        || jo < 0
        || jo as usize >= self.sentence.len()
      {
        continue;
      }
      let lemma = &self.headline[io as usize].lemma;
      if lemma == &self.sentence[jo as usize].lemma {
        count += if lemma == &self.params.punctuation_lemma {
          self.params.punctuation_weight
        } else {
          1.0
        };
      } else {
        count = 0.0;
      }
      score = score.max(count - 1.0);
    }
    score
  }

  /// Bonus for the neighbouring open-class words on either side agreeing,
  /// discounted by how far the sentence-side neighbour is.
  fn oc_score(&self, i: usize, j: usize, headline_ocs: &[usize], sentence_ocs: &[usize]) -> f64 {
    let len = self.sentence.len() as f64;
    let mut score = 0.0;
    let next_h = headline_ocs.iter().find(|&&k| k > i);
    let next_s = sentence_ocs.iter().find(|&&k| k > j);
    if let (Some(&h), Some(&s)) = (next_h, next_s) {
      if self.headline[h].lemma == self.sentence[s].lemma {
        score += 1.0 - (s - j) as f64 / len;
      }
    }
    let prev_h = headline_ocs.iter().rev().find(|&&k| k < i);
    let prev_s = sentence_ocs.iter().rev().find(|&&k| k < j);
    if let (Some(&h), Some(&s)) = (prev_h, prev_s) {
      if self.headline[h].lemma == self.sentence[s].lemma {
        score += 1.0 - (j - s) as f64 / len;
      }
    }
    score
  }
}

fn positions(morphemes: &[Morpheme], lemma: &str) -> Vec<usize> {
  morphemes
    .iter()
    .enumerate()
    .filter(|(_, m)| m.lemma == lemma)
    .map(|(i, _)| i)
    .collect()
}
