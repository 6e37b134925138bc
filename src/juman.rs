use crate::knp::morpheme::{Morpheme, MorphemeErr};

pub const EOS: &str = "EOS";

/// Decodes a JUMAN output block into morphemes. Alternative readings (`@`
/// lines) and the `EOS` sentinel are skipped. Lines are not trimmed since a
/// full-width space is a morpheme of its own.
pub fn decode_juman_output(output: &str) -> Result<Vec<Morpheme>, MorphemeErr> {
  let mut morphemes = vec![];
  for line in output.lines() {
    if line.is_empty() || line == EOS || line.starts_with('@') {
      continue;
    }
    morphemes.push(Morpheme::from_line(line)?);
  }
  Ok(morphemes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{juman_output_of, AURORA_HEADLINE_JUMAN, AURORA_KNP};

  #[test]
  fn test_decode_headline() {
    let morphemes = decode_juman_output(AURORA_HEADLINE_JUMAN).unwrap();
    assert_eq!(18, morphemes.len());
    assert_eq!("オーロラ", morphemes[0].surface);
    assert_eq!("　", morphemes[10].surface);
    assert_eq!("から", morphemes[17].lemma);
  }

  #[test]
  fn test_skip_alternatives() {
    let output = "はし はし はし 名詞 6 普通名詞 1 * 0 * 0 NIL\n@ はし はし 箸 名詞 6 普通名詞 1 * 0 * 0 NIL\nEOS\n";
    let morphemes = decode_juman_output(output).unwrap();
    assert_eq!(1, morphemes.len());
  }

  #[test]
  fn test_decode_sentence_with_features() {
    let morphemes = decode_juman_output(&juman_output_of(AURORA_KNP)).unwrap();
    assert_eq!(48, morphemes.len());
    assert!(morphemes[45].is_inflectable());
  }
}
