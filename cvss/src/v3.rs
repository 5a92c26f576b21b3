use crate::{breakdown, MetricRisk, Risk};

/// Risk breakdown of a CVSS v3 vector such as
/// `CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H`.
pub fn risk_breakdown(vector: &str) -> Vec<MetricRisk> {
    breakdown(vector, risk_of)
}

fn risk_of(tag: &str, value: &str) -> Option<Risk> {
    match (tag, value) {
        ("AV", "N") => Some(Risk::High),
        ("AV", "A") => Some(Risk::Medium),
        ("AV", "L") => Some(Risk::Medium),
        ("AV", "P") => Some(Risk::Low),

        ("AC", "L") => Some(Risk::High),
        ("AC", "H") => Some(Risk::Low),

        ("PR", "N") => Some(Risk::High),
        ("PR", "L") => Some(Risk::Medium),
        ("PR", "H") => Some(Risk::Low),

        ("UI", "N") => Some(Risk::High),
        ("UI", "R") => Some(Risk::Medium),

        ("C" | "I" | "A", "H") => Some(Risk::High),
        ("C" | "I" | "A", "L" | "N") => Some(Risk::Low),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_network_vector() {
        let out = risk_breakdown("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H");
        let expected = [
            ("Attack Vector", Risk::High),
            ("Attack Complexity", Risk::High),
            ("Privileges Required", Risk::High),
            ("User Interaction", Risk::High),
            ("Confidentiality Impact", Risk::High),
            ("Integrity Impact", Risk::High),
            ("Availability Impact", Risk::High),
        ];
        assert_eq!(out.len(), expected.len());
        for (item, (metric, risk)) in out.iter().zip(expected) {
            assert_eq!(item.metric, metric);
            assert_eq!(item.risk, risk);
        }
    }

    #[test]
    fn local_vector_mixes_risks() {
        let out = risk_breakdown("CVSS:3.0/AV:L/AC:H/PR:H/UI:R/S:C/C:L/I:N/A:N");
        let risks: Vec<_> = out.iter().map(|m| m.risk).collect();
        assert_eq!(
            risks,
            vec![
                Risk::Medium, // AV:L
                Risk::Low,    // AC:H
                Risk::Low,    // PR:H
                Risk::Medium, // UI:R
                Risk::Low,    // C:L
                Risk::Low,    // I:N
                Risk::Low,    // A:N
            ]
        );
    }

    #[test]
    fn unknown_values_are_dropped() {
        assert!(risk_breakdown("AV:X/UI:X").is_empty());
        assert!(risk_breakdown("").is_empty());
    }
}
