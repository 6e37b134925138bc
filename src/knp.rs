//! Decoding of `knp -tab` output.

pub mod case_analysis;
pub mod dependency;
pub mod features;
pub mod morpheme;
pub mod parsed_sentence;
pub mod phrase;

pub use self::morpheme::Morpheme;
pub use self::parsed_sentence::{KnpParseErr, ParsedSentence};
pub use self::phrase::{BasicPhrase, Phrase};
