use crate::{breakdown, MetricRisk, Risk};

/// Risk breakdown of a CVSS v2 vector. NVD publishes these wrapped in
/// parentheses, `(AV:N/AC:M/Au:N/C:P/I:P/A:P)`, so those are stripped
/// before parsing.
pub fn risk_breakdown(vector: &str) -> Vec<MetricRisk> {
    let vector = vector.replace(['(', ')'], "");
    breakdown(&vector, risk_of)
}

fn risk_of(tag: &str, value: &str) -> Option<Risk> {
    match (tag, value) {
        ("AV", "N") => Some(Risk::High),
        ("AV", "A") => Some(Risk::Medium),
        ("AV", "L") => Some(Risk::Low),

        ("AC", "L") => Some(Risk::High),
        ("AC", "M" | "H") => Some(Risk::Low),

        ("C" | "I" | "A", "C") => Some(Risk::High),
        ("C" | "I" | "A", "P" | "N") => Some(Risk::Low),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesised_vector() {
        let out = risk_breakdown("(AV:N/AC:M/Au:N/C:P/I:P/A:P)");
        // Au has no risk mapping and is dropped.
        let expected = [
            ("Attack Vector", Risk::High),
            ("Attack Complexity", Risk::Low),
            ("Confidentiality Impact", Risk::Low),
            ("Integrity Impact", Risk::Low),
            ("Availability Impact", Risk::Low),
        ];
        assert_eq!(out.len(), expected.len());
        for (item, (metric, risk)) in out.iter().zip(expected) {
            assert_eq!(item.metric, metric);
            assert_eq!(item.risk, risk);
        }
    }

    #[test]
    fn complete_compromise_is_high() {
        let out = risk_breakdown("AV:L/AC:L/C:C/I:C/A:C");
        let risks: Vec<_> = out.iter().map(|m| m.risk).collect();
        assert_eq!(
            risks,
            vec![Risk::Low, Risk::High, Risk::High, Risk::High, Risk::High]
        );
    }
}
