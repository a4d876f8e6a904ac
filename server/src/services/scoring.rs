//! Deterministic text heuristics behind the four UI metrics. Providers do not
//! return scores; everything here is derived from the text itself plus the
//! number of issues the pipeline found.

use crate::types::Metrics;

pub fn compute_metrics(text: &str, issue_count: usize) -> Metrics {
    let words: Vec<&str> = text.split_whitespace().collect();
    let word_count = words.len().max(1);
    let sentence_count = text.matches(['.', '!', '?']).count().max(1);
    let avg_sentence_len = word_count as f64 / sentence_count as f64;

    let unique_words = {
        let mut seen: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        seen.sort();
        seen.dedup();
        seen.len()
    };
    let variety = unique_words as f64 / word_count as f64;

    let correctness = 100_f64 - (issue_count as f64 * 8.0).min(55.0);

    // Mid-length sentences read best; both fragments and run-ons cost clarity.
    let clarity = 100.0 - ((avg_sentence_len - 14.0).abs() * 2.5).min(40.0);

    let engagement = 55.0 + (variety * 45.0).min(45.0);

    let delivery = (correctness * 0.4 + clarity * 0.3 + engagement * 0.3).min(100.0);

    Metrics {
        correctness: clamp_score(correctness),
        clarity: clamp_score(clarity),
        engagement: clamp_score(engagement),
        delivery: clamp_score(delivery),
    }
}

pub fn clamp_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_bounds(m: &Metrics) {
        // u8 already caps at 255; the interesting bound is <= 100
        assert!(m.correctness <= 100);
        assert!(m.clarity <= 100);
        assert!(m.engagement <= 100);
        assert!(m.delivery <= 100);
    }

    #[test]
    fn metrics_stay_in_bounds() {
        in_bounds(&compute_metrics("Short.", 0));
        in_bounds(&compute_metrics(&"word ".repeat(500), 40));
        in_bounds(&compute_metrics("", 0));
    }

    #[test]
    fn more_issues_lower_correctness() {
        let clean = compute_metrics("He goes to school every day.", 0);
        let messy = compute_metrics("He goes to school every day.", 5);
        assert!(messy.correctness < clean.correctness);
    }

    #[test]
    fn deterministic_for_same_input() {
        let a = compute_metrics("The same text scores the same.", 1);
        let b = compute_metrics("The same text scores the same.", 1);
        assert_eq!(a.correctness, b.correctness);
        assert_eq!(a.delivery, b.delivery);
    }
}
