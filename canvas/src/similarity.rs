//! Similarity dial: how literally the model should follow the sketch.
//!
//! The level is a number in `[0, 1]`. It maps onto one of five fixed
//! instructions by inclusive upper bound, checked in ascending order, so the
//! boundary values 0.2, 0.4, 0.6 and 0.8 land in the lower bucket.

#[cfg(test)]
#[path = "similarity_test.rs"]
mod similarity_test;

use crate::consts::STYLE_DIRECTIVE;

/// Upper bound (inclusive) and instruction for each bucket but the last.
const BUCKETS: [(f64, &str); 4] = [
    (0.2, "Be highly creative; you may reinterpret the drawing completely."),
    (0.4, "Be creative and use the drawing as a loose guide."),
    (0.6, "Balance the original drawing with creative interpretation."),
    (0.8, "Adhere closely to the lines and shapes of the drawing."),
];

/// Instruction for levels above the last bound.
const EXACT: &str = "Replicate the drawing as precisely as possible; only add detail and texture from the prompt.";

/// Bucket used when the level is not a number.
const MIDDLE: usize = 2;

/// Instruction string for a similarity level.
///
/// Out-of-range levels are clamped to `[0, 1]`; NaN picks the middle bucket.
#[must_use]
pub fn instruction_for(level: f64) -> &'static str {
    if level.is_nan() {
        return BUCKETS[MIDDLE].1;
    }
    let level = level.clamp(0.0, 1.0);
    BUCKETS
        .iter()
        .find(|(bound, _)| level <= *bound)
        .map_or(EXACT, |(_, text)| *text)
}

/// All five instructions in ascending similarity order.
#[must_use]
pub fn all_instructions() -> [&'static str; 5] {
    [BUCKETS[0].1, BUCKETS[1].1, BUCKETS[2].1, BUCKETS[3].1, EXACT]
}

/// Text part sent to the model: the prompt, the similarity instruction, and
/// the style directive.
#[must_use]
pub fn compose_prompt(prompt: &str, level: f64) -> String {
    let prompt = prompt.trim().trim_end_matches('.');
    format!("{prompt}. {} {STYLE_DIRECTIVE}", instruction_for(level))
}
