use serde::Serialize;

pub mod v2;
pub mod v3;

/// Qualitative risk contributed by a single vector component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl Risk {
    pub fn percentage(self) -> u8 {
        match self {
            Risk::High => 75,
            Risk::Medium => 50,
            Risk::Low => 25,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Risk::High => "High risk",
            Risk::Medium => "Medium risk",
            Risk::Low => "Low risk",
        }
    }

    /// CSS class used by the detail page progress bars.
    pub fn bar_color(self) -> &'static str {
        match self {
            Risk::High => "bg-danger",
            Risk::Medium => "bg-warning",
            Risk::Low => "bg-success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricRisk {
    pub metric: &'static str,
    pub risk: Risk,
}

fn metric_full_name(tag: &str) -> Option<&'static str> {
    match tag {
        "AV" => Some("Attack Vector"),
        "AC" => Some("Attack Complexity"),
        "PR" => Some("Privileges Required"),
        "UI" => Some("User Interaction"),
        "C" => Some("Confidentiality Impact"),
        "I" => Some("Integrity Impact"),
        "A" => Some("Availability Impact"),
        _ => None,
    }
}

/// Walk the `metric:value` segments of a vector, keeping the ones both
/// known to the naming table and rated by `risk_of`. Unknown segments
/// (version prefixes, scope, temporal metrics) are skipped, not errors.
fn breakdown(vector: &str, risk_of: fn(&str, &str) -> Option<Risk>) -> Vec<MetricRisk> {
    vector
        .split('/')
        .filter_map(|segment| {
            let (tag, value) = segment.split_once(':')?;
            let metric = metric_full_name(tag)?;
            let risk = risk_of(tag, value)?;
            Some(MetricRisk { metric, risk })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_presentation_attributes() {
        assert_eq!(Risk::High.percentage(), 75);
        assert_eq!(Risk::Medium.percentage(), 50);
        assert_eq!(Risk::Low.percentage(), 25);
        assert_eq!(Risk::High.bar_color(), "bg-danger");
        assert_eq!(Risk::Medium.bar_color(), "bg-warning");
        assert_eq!(Risk::Low.bar_color(), "bg-success");
        assert_eq!(Risk::High.label(), "High risk");
    }

    #[test]
    fn unknown_tags_are_skipped() {
        let out = breakdown("CVSS:3.1/AV:N/S:U", |tag, value| match (tag, value) {
            ("AV", "N") => Some(Risk::High),
            _ => None,
        });
        assert_eq!(
            out,
            vec![MetricRisk {
                metric: "Attack Vector",
                risk: Risk::High
            }]
        );
    }
}
