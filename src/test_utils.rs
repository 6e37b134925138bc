pub const AURORA_KNP: &str = include_str!("../resources/test/aurora.knp");
pub const AURORA_HEADLINE_JUMAN: &str = include_str!("../resources/test/aurora_headline.juman");
pub const COORDINATED_VERBS_KNP: &str = include_str!("../resources/test/coordinated_verbs.knp");
pub const COORDINATED_NOUNS_KNP: &str = include_str!("../resources/test/coordinated_nouns.knp");
pub const KATUYOU: &str = include_str!("../resources/test/katuyou.txt");

pub const AURORA_HEADLINE: &str = "オーロラ展:野口宇宙飛行士らが宇宙で撮影 東京・新宿で5日から";
pub const AURORA_SENTENCE: &str = "野口聡一宇宙飛行士(45)らが国際宇宙ステーションから撮影したオーロラの写真を中心とした「宇宙から見たオーロラ展2011」が5~31日、東京都新宿区新宿3のコニカミノルタプラザ(03・3225・5001)で開かれる。";

/// The morpheme lines of a parser block, which is what the tagger printed
/// for the same sentence.
pub fn juman_output_of(knp: &str) -> String {
  let mut output = String::new();
  for line in knp.lines() {
    if line.starts_with('*') || line.starts_with('+') || line.starts_with('#') {
      continue;
    }
    output.push_str(line);
    output.push('\n');
  }
  output
}
