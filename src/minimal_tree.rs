use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use thiserror::Error;

use crate::knp::ParsedSentence;

/// Heads whose arguments are kept together with them.
const LIGHT_VERBS: [&str; 2] = ["する", "なる"];
const LIGHT_VERB_CASES: [&str; 3] = ["ト", "ニ", "カラ"];
const SUBJECT_CASE: &str = "ガ";

#[derive(Error, Debug, PartialEq)]
pub enum ExtractErr {
  #[error("no aligned morphemes to extract a tree for")]
  EmptySelection,
  #[error("no predicate above the aligned basic phrases")]
  NoPredicate,
  #[error("dependency cycle reached from basic phrase {0}")]
  Cycle(usize),
}

/// Next basic phrase on the way to the root. A coordinated basic phrase first
/// hops to its peer and then continues from the peer's head, so both
/// conjuncts share the ancestors above the coordination.
pub fn advance_past_coordination(sentence: &ParsedSentence, basic: usize) -> Option<usize> {
  let b = &sentence.basics[basic];
  if b.is_coordination() {
    let peer = b.target()?;
    sentence.basics[peer].target()
  } else {
    b.target()
  }
}

/// The smallest predicate-rooted set of basic phrases covering the basic
/// phrases of the `selected` morphemes, in ascending order.
pub fn extract_minimal_tree(
  sentence: &ParsedSentence,
  selected: &[usize],
) -> Result<Vec<usize>, ExtractErr> {
  let necessary: BTreeSet<usize> = selected
    .iter()
    .map(|&m| sentence.basic_of_morpheme(m))
    .collect();
  if necessary.is_empty() {
    return Err(ExtractErr::EmptySelection);
  }

  let mut paths: Vec<BTreeSet<usize>> = vec![];
  let mut cooccurrence: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
  for &start in &necessary {
    let mut path = BTreeSet::new();
    let mut current = Some(start);
    let mut steps = 0;
    while let Some(b) = current {
      steps += 1;
      if steps > sentence.basics.len() {
        return Err(ExtractErr::Cycle(start));
      }
      path.insert(b);
      record_cooccurrence(sentence, b, &mut cooccurrence);
      current = advance_past_coordination(sentence, b);
    }
    paths.push(path);
  }

  let mut intersection = paths[0].clone();
  let mut union = BTreeSet::new();
  for path in &paths {
    intersection = intersection.intersection(path).cloned().collect();
    union.extend(path.iter().cloned());
  }

  // everything on the shared spine up to the first predicate goes; the
  // predicate itself becomes the root
  let mut root = None;
  for b in intersection.clone() {
    intersection.remove(&b);
    // any 用言 qualifies, copulas (用言:判) included
    if sentence.basics[b].is_predicate() {
      root = Some(b);
      break;
    }
  }
  let root = root.ok_or(ExtractErr::NoPredicate)?;
  debug!("new root: basic phrase {}", root);

  let mut compressed: BTreeSet<usize> = (0..sentence.basics.len())
    .filter(|b| union.contains(b) && !intersection.contains(b))
    .collect();

  let mut pending: Vec<usize> = compressed.iter().cloned().collect();
  while let Some(b) = pending.pop() {
    if let Some(fillers) = cooccurrence.get(&b) {
      for &filler in fillers {
        if compressed.insert(filler) {
          pending.push(filler);
        }
      }
    }
  }
  Ok(compressed.into_iter().collect())
}

fn record_cooccurrence(
  sentence: &ParsedSentence,
  basic: usize,
  cooccurrence: &mut BTreeMap<usize, BTreeSet<usize>>,
) {
  let case_analysis = match sentence.basics[basic].features.case_analysis() {
    Some(c) => c,
    None => return,
  };
  let mut fillers = vec![];
  if let Some(head) = sentence.head_lemma(basic) {
    if LIGHT_VERBS.contains(&head) {
      for case in &LIGHT_VERB_CASES {
        fillers.extend(case_analysis.last_local_filler_basic(case));
      }
    }
  }
  fillers.extend(case_analysis.last_local_filler_basic(SUBJECT_CASE));
  let entry = cooccurrence.entry(basic).or_default();
  for filler in fillers {
    if filler < sentence.basics.len() {
      entry.insert(filler);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{AURORA_KNP, COORDINATED_NOUNS_KNP, COORDINATED_VERBS_KNP};

  #[test]
  fn test_aurora_tree() {
    let sentence = ParsedSentence::parse(AURORA_KNP).unwrap();
    let selected = [25, 26, 0, 2, 6, 9, 35, 37, 30];
    let tree = extract_minimal_tree(&sentence, &selected).unwrap();
    let expected: Vec<usize> = (0..22).filter(|b| ![2, 10, 11, 19].contains(b)).collect();
    assert_eq!(expected, tree);
    assert!(tree.iter().any(|&b| sentence.basics[b].is_predicate()));
  }

  #[test]
  fn test_root_moves_down_to_predicate() {
    let sentence = ParsedSentence::parse(AURORA_KNP).unwrap();
    // 野口 and 撮影 meet at 撮影した, which becomes the root
    let tree = extract_minimal_tree(&sentence, &[0, 9]).unwrap();
    assert_eq!(vec![0, 1, 5], tree);
  }

  #[test]
  fn test_light_verb_keeps_its_argument() {
    let sentence = ParsedSentence::parse(AURORA_KNP).unwrap();
    // した (する) pulls in its ト filler 中心と
    let tree = extract_minimal_tree(&sentence, &[18]).unwrap();
    assert_eq!(vec![8, 9], tree);
  }

  #[test]
  fn test_coordination_is_skipped() {
    let sentence = ParsedSentence::parse(COORDINATED_VERBS_KNP).unwrap();
    assert_eq!(None, advance_past_coordination(&sentence, 1));
    let tree = extract_minimal_tree(&sentence, &[0]).unwrap();
    assert_eq!(vec![0, 1], tree);

    let sentence = ParsedSentence::parse(COORDINATED_NOUNS_KNP).unwrap();
    assert_eq!(Some(2), advance_past_coordination(&sentence, 0));
    let tree = extract_minimal_tree(&sentence, &[0, 4]).unwrap();
    assert_eq!(vec![0, 2], tree);
  }

  #[test]
  fn test_fillers_from_preceding_sentences_are_ignored() {
    let text = "* 2D\n+ 2D\n東京 とうきょう 東京 名詞 6 地名 4 * 0 * 0 NIL\n\
                * 2D\n+ 2D\n大阪 おおさか 大阪 名詞 6 地名 4 * 0 * 0 NIL\n\
                * -1D <用言:動>\n+ -1D <用言:動><格解析結果:行く/いく:動1:ガ/O/彼/0/1/1>\n\
                行く いく 行く 動詞 2 * 0 子音動詞カ行促音便形 3 基本形 2 NIL\nEOS\n";
    let sentence = ParsedSentence::parse(text).unwrap();
    assert_eq!(Ok(vec![1, 2]), extract_minimal_tree(&sentence, &[1, 2]));
  }

  #[test]
  fn test_copula_can_be_root() {
    let text = "* 1D\n+ 1D\n彼 かれ 彼 名詞 6 普通名詞 1 * 0 * 0 NIL\n\
                は は は 助詞 9 副助詞 2 * 0 * 0 NIL\n\
                * -1D <用言:判>\n+ -1D <用言:判>\n\
                学生 がくせい 学生 名詞 6 普通名詞 1 * 0 * 0 NIL\n\
                だ だ だ 判定詞 4 * 0 判定詞 25 基本形 2 NIL\nEOS\n";
    let sentence = ParsedSentence::parse(text).unwrap();
    assert_eq!(Ok(vec![0, 1]), extract_minimal_tree(&sentence, &[0, 2]));
  }

  #[test]
  fn test_no_predicate() {
    let text = "* 1D <体言>\n+ 1D <体言>\n東京 とうきょう 東京 名詞 6 地名 4 * 0 * 0 NIL\n* -1D <体言>\n+ -1D <体言>\n大阪 おおさか 大阪 名詞 6 地名 4 * 0 * 0 NIL\nEOS\n";
    let sentence = ParsedSentence::parse(text).unwrap();
    assert_eq!(Err(ExtractErr::NoPredicate), extract_minimal_tree(&sentence, &[0, 1]));
  }

  #[test]
  fn test_cycle() {
    let text = "* 1D\n+ 1D\n東京 とうきょう 東京 名詞 6 地名 4 * 0 * 0 NIL\n* 0D\n+ 0D\n大阪 おおさか 大阪 名詞 6 地名 4 * 0 * 0 NIL\n";
    let sentence = ParsedSentence::parse(text).unwrap();
    assert_eq!(Err(ExtractErr::Cycle(0)), extract_minimal_tree(&sentence, &[0]));
  }

  #[test]
  fn test_empty_selection() {
    let sentence = ParsedSentence::parse(AURORA_KNP).unwrap();
    assert_eq!(Err(ExtractErr::EmptySelection), extract_minimal_tree(&sentence, &[]));
  }
}
