//! Rule-based compound sentiment scorer tuned for financial headlines.

use analysis_core::SentimentScorer;
use std::collections::{HashMap, HashSet};

/// Word valences on a -4..4 scale.
const VALENCES: &[(&str, f64)] = &[
    // Positive
    ("bullish", 2.6),
    ("rally", 2.0),
    ("rallies", 2.0),
    ("surge", 2.3),
    ("surges", 2.3),
    ("soar", 2.6),
    ("soars", 2.6),
    ("gain", 1.6),
    ("gains", 1.6),
    ("profit", 1.8),
    ("profits", 1.8),
    ("growth", 1.7),
    ("beat", 1.5),
    ("beats", 1.5),
    ("upgrade", 2.0),
    ("upgraded", 2.0),
    ("outperform", 1.9),
    ("strong", 2.3),
    ("positive", 2.2),
    ("rise", 1.2),
    ("rises", 1.2),
    ("increase", 1.1),
    ("breakthrough", 2.4),
    ("innovation", 1.6),
    ("success", 2.7),
    ("successful", 2.7),
    ("exceed", 1.5),
    ("exceeds", 1.5),
    ("momentum", 1.0),
    ("buy", 1.0),
    ("recommend", 1.5),
    ("optimistic", 2.3),
    ("record", 1.3),
    ("high", 0.8),
    ("advance", 1.2),
    ("dividend", 0.8),
    ("buyback", 1.2),
    ("repurchase", 1.0),
    ("accretive", 1.5),
    ("upside", 1.6),
    ("recovery", 1.7),
    ("rebound", 1.6),
    ("expansion", 1.3),
    ("robust", 1.9),
    ("accelerating", 1.4),
    ("overweight", 1.2),
    ("raised", 1.0),
    ("reiterated", 0.6),
    ("outpacing", 1.5),
    ("tailwind", 1.4),
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 3.2),
    ("win", 2.8),
    ("wins", 2.8),
    ("approval", 2.1),
    ("approved", 1.8),
    // Negative
    ("bearish", -2.6),
    ("decline", -1.6),
    ("declines", -1.6),
    ("loss", -1.9),
    ("losses", -1.9),
    ("fall", -1.5),
    ("falls", -1.5),
    ("plunge", -2.5),
    ("plunges", -2.5),
    ("crash", -3.0),
    ("miss", -1.5),
    ("misses", -1.5),
    ("downgrade", -2.0),
    ("downgraded", -2.0),
    ("underperform", -1.9),
    ("weak", -1.9),
    ("negative", -2.3),
    ("drop", -1.3),
    ("drops", -1.3),
    ("decrease", -1.1),
    ("concern", -1.4),
    ("concerns", -1.4),
    ("risk", -1.1),
    ("fail", -2.5),
    ("fails", -2.5),
    ("disappoint", -2.1),
    ("disappointing", -2.2),
    ("slump", -2.1),
    ("sell", -1.0),
    ("warning", -1.7),
    ("pessimistic", -2.2),
    ("low", -0.8),
    ("retreat", -1.0),
    ("fear", -2.2),
    ("fears", -2.2),
    ("trouble", -2.0),
    ("dilution", -1.5),
    ("dilutive", -1.5),
    ("headwind", -1.4),
    ("lawsuit", -1.8),
    ("litigation", -1.6),
    ("recall", -1.7),
    ("investigation", -1.6),
    ("probe", -1.5),
    ("default", -2.4),
    ("bankruptcy", -3.2),
    ("restructuring", -1.0),
    ("layoff", -2.0),
    ("layoffs", -2.0),
    ("downside", -1.6),
    ("overvalued", -1.3),
    ("bubble", -1.4),
    ("underweight", -1.2),
    ("lowered", -1.1),
    ("suspended", -1.8),
    ("bad", -2.5),
    ("terrible", -3.1),
    ("fraud", -3.3),
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "aren't",
    "wasn't", "weren't", "won't", "wouldn't", "couldn't", "shouldn't",
    "neither", "nor", "without", "cannot",
];

/// Intensity modifiers applied to the next sentiment word.
const BOOSTERS: &[(&str, f64)] = &[
    ("very", 0.293),
    ("extremely", 0.293),
    ("sharply", 0.293),
    ("significantly", 0.293),
    ("strongly", 0.293),
    ("hugely", 0.293),
    ("massively", 0.293),
    ("deeply", 0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("marginally", -0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
];

const NEGATION_WINDOW: usize = 3;
/// Booster weight by distance (1, 2, 3 tokens before the sentiment word).
const BOOSTER_DECAY: [f64; NEGATION_WINDOW] = [1.0, 0.95, 0.9];
const NEGATION_SCALAR: f64 = -0.74;
const CAPS_INCREMENT: f64 = 0.733;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 3;
const BUT_BEFORE_WEIGHT: f64 = 0.5;
const BUT_AFTER_WEIGHT: f64 = 1.5;
/// Normalization constant: compound = s / sqrt(s^2 + ALPHA).
const NORMALIZATION_ALPHA: f64 = 15.0;

struct Token<'a> {
    raw: &'a str,
    lower: String,
}

pub struct LexiconScorer {
    valences: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            valences: VALENCES.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATION_WORDS.iter().copied().collect(),
        }
    }

    fn tokenize(text: &str) -> Vec<Token<'_>> {
        text.split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .map(|w| w.trim_matches('\''))
            .filter(|w| !w.is_empty())
            .map(|raw| Token {
                raw,
                lower: raw.to_lowercase(),
            })
            .collect()
    }

    fn is_shouting(token: &str) -> bool {
        token.chars().filter(|c| c.is_alphabetic()).count() > 1
            && token.chars().all(|c| !c.is_lowercase())
    }

    fn valence_at(&self, tokens: &[Token<'_>], i: usize, mixed_case: bool) -> Option<f64> {
        let base = *self.valences.get(tokens[i].lower.as_str())?;
        let sign = base.signum();
        let mut valence = base;

        if mixed_case && Self::is_shouting(tokens[i].raw) {
            valence += sign * CAPS_INCREMENT;
        }

        let mut negated = false;
        for (distance, decay) in BOOSTER_DECAY.iter().enumerate() {
            let Some(j) = i.checked_sub(distance + 1) else {
                break;
            };
            let prior = tokens[j].lower.as_str();
            if let Some(&boost) = self.boosters.get(prior) {
                valence += sign * boost * decay;
            }
            if self.negations.contains(prior) {
                negated = true;
            }
        }

        if negated {
            valence *= NEGATION_SCALAR;
        }

        Some(valence)
    }

    /// Raw (unnormalized) sentiment sum of `text`.
    pub fn raw_score(&self, text: &str) -> f64 {
        let tokens = Self::tokenize(text);
        let mixed_case = tokens.iter().any(|t| !Self::is_shouting(t.raw));
        let but_at = tokens.iter().position(|t| t.lower == "but");

        let mut score: f64 = (0..tokens.len())
            .filter_map(|i| {
                let valence = self.valence_at(&tokens, i, mixed_case)?;
                Some(match but_at {
                    Some(b) if i < b => valence * BUT_BEFORE_WEIGHT,
                    Some(b) if i > b => valence * BUT_AFTER_WEIGHT,
                    _ => valence,
                })
            })
            .sum();

        if score != 0.0 {
            let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
            score += score.signum() * bangs * EXCLAMATION_INCREMENT;
        }

        score
    }

    fn normalize(score: f64) -> f64 {
        score / (score * score + NORMALIZATION_ALPHA).sqrt()
    }
}

impl SentimentScorer for LexiconScorer {
    fn compound(&self, text: &str) -> f64 {
        Self::normalize(self.raw_score(text))
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}
