//! Lexicon-based sentiment classification.
//!
//! A tweet's label is the sign of its aggregate word score: strictly
//! positive scores map to `Positive`, strictly negative to `Negative`,
//! and zero (including empty text) to `Neutral`. The scorer is a pure
//! function behind the [`SentimentModel`] trait so the lexicon or the
//! algorithm can be swapped without touching callers.

use crate::model::Sentiment;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Capability interface for sentiment scoring.
///
/// Implementations must be deterministic and side-effect free.
pub trait SentimentModel {
    /// Aggregate sentiment score for a piece of text.
    fn score(&self, text: &str) -> i64;

    /// Classify text by the sign of its score.
    fn classify(&self, text: &str) -> Sentiment {
        match self.score(text) {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

/// AFINN-style valence lexicon, scores in [-5, 5].
///
/// A trimmed word list covering the vocabulary that actually moves
/// engagement-style text; unknown words score 0.
static LEXICON: Lazy<HashMap<&'static str, i64>> = Lazy::new(|| {
    WORD_SCORES.iter().copied().collect()
});

#[rustfmt::skip]
const WORD_SCORES: &[(&str, i64)] = &[
    ("abandon", -2), ("abuse", -3), ("accomplish", 2), ("ache", -2),
    ("admire", 3), ("adore", 3), ("adventure", 2), ("afraid", -2),
    ("aggressive", -2), ("agree", 1), ("alarm", -2), ("amazing", 4),
    ("angry", -3), ("annoying", -2), ("anxious", -2), ("appalling", -2),
    ("applaud", 2), ("appreciate", 2), ("approve", 2), ("ashamed", -2),
    ("attack", -1), ("awesome", 4), ("awful", -3), ("awkward", -2),
    ("bad", -3), ("beautiful", 3), ("benefit", 2), ("best", 3),
    ("betray", -3), ("bless", 2), ("block", -1), ("boring", -3),
    ("brave", 2), ("breathtaking", 5), ("brilliant", 4), ("broken", -1),
    ("calm", 2), ("celebrate", 3), ("champion", 2), ("chaos", -2),
    ("charming", 3), ("cheat", -3), ("cheerful", 2), ("clever", 2),
    ("collapse", -2), ("comfort", 2), ("complain", -2), ("confident", 2),
    ("confuse", -2), ("congratulations", 2), ("crash", -2), ("creative", 2),
    ("crisis", -3), ("cruel", -3), ("cry", -1), ("damage", -3),
    ("danger", -2), ("dead", -3), ("defeat", -2), ("delight", 3),
    ("depressed", -2), ("despair", -3), ("destroy", -3), ("die", -3),
    ("dirty", -2), ("disappointed", -2), ("disaster", -2), ("disgust", -3),
    ("dishonest", -2), ("dislike", -2), ("dream", 1), ("dull", -2),
    ("eager", 2), ("easy", 1), ("elegant", 2), ("embarrass", -2),
    ("encourage", 2), ("enjoy", 2), ("enthusiastic", 3), ("evil", -3),
    ("excellent", 3), ("excited", 3), ("exciting", 3), ("fail", -2),
    ("failure", -2), ("fake", -3), ("fantastic", 4), ("favorite", 2),
    ("fear", -2), ("fight", -1), ("fraud", -4), ("free", 1),
    ("fresh", 1), ("frustrated", -2), ("fun", 4), ("funny", 4),
    ("generous", 2), ("gift", 2), ("glad", 3), ("good", 3),
    ("grateful", 3), ("great", 3), ("greed", -3), ("grief", -2),
    ("happy", 3), ("hate", -3), ("hell", -4), ("help", 2),
    ("hero", 2), ("honest", 2), ("hope", 2), ("hopeful", 2),
    ("horrible", -3), ("hurt", -2), ("ignore", -1), ("impressive", 3),
    ("improve", 2), ("incredible", 4), ("innovative", 1), ("inspire", 2),
    ("interesting", 2), ("joy", 3), ("kill", -3), ("kind", 2),
    ("laugh", 1), ("lie", -1), ("like", 2), ("lose", -3),
    ("loss", -3), ("love", 3), ("lovely", 3), ("loyal", 3),
    ("lucky", 3), ("mad", -3), ("masterpiece", 4), ("mess", -2),
    ("miss", -2), ("mistake", -2), ("nice", 3), ("noisy", -1),
    ("outstanding", 5), ("pain", -2), ("panic", -3), ("peace", 2),
    ("perfect", 3), ("pleasant", 3), ("poor", -2), ("popular", 3),
    ("positive", 2), ("praise", 3), ("pretty", 1), ("problem", -2),
    ("protect", 1), ("proud", 2), ("reject", -1), ("relax", 2),
    ("rich", 2), ("risk", -2), ("ruin", -2), ("sad", -2),
    ("safe", 1), ("scam", -2), ("scandal", -3), ("scared", -2),
    ("sick", -2), ("smart", 1), ("smile", 2), ("sorry", -1),
    ("strong", 2), ("stupid", -2), ("succeed", 3), ("success", 2),
    ("suffer", -2), ("super", 3), ("support", 2), ("terrible", -3),
    ("terrific", 4), ("thank", 2), ("thanks", 2), ("threat", -2),
    ("thrilled", 5), ("tragedy", -2), ("trouble", -2), ("trust", 1),
    ("ugly", -3), ("unhappy", -2), ("useful", 2), ("useless", -2),
    ("victory", 3), ("violent", -3), ("warm", 1), ("waste", -1),
    ("weak", -2), ("welcome", 2), ("win", 4), ("winner", 4),
    ("wonderful", 4), ("worry", -3), ("worse", -3), ("worst", -3),
    ("wow", 4), ("wrong", -2),
];

/// The built-in lexicon scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexicon;

impl SentimentModel for Lexicon {
    fn score(&self, text: &str) -> i64 {
        tokens(text).map(|word| LEXICON.get(word.as_str()).copied().unwrap_or(0)).sum()
    }
}

/// Lowercased alphabetic tokens of the input, punctuation stripped.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .map(|t| t.trim_matches('\'').to_lowercase())
}
