use serde::Serialize;
use shared::{domain::AlertSeverity, protocol::Alert};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertEmphasis {
    High,
    Standard,
}

impl From<AlertSeverity> for AlertEmphasis {
    fn from(value: AlertSeverity) -> Self {
        match value {
            AlertSeverity::High => AlertEmphasis::High,
            AlertSeverity::Standard => AlertEmphasis::Standard,
        }
    }
}

/// Display-ready view over the alert slot of a snapshot.
///
/// Borrowed, provider order untouched; severity only picks the emphasis.
#[derive(Debug, Clone, Copy)]
pub struct AlertDigest<'a> {
    alerts: &'a [Alert],
}

impl<'a> AlertDigest<'a> {
    pub fn new(alerts: &'a [Alert]) -> Self {
        Self { alerts }
    }

    pub fn alerts(&self) -> &'a [Alert] {
        self.alerts
    }

    pub fn has_active_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub fn high_severity_count(&self) -> usize {
        self.alerts
            .iter()
            .filter(|alert| alert.severity.is_high())
            .count()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'a Alert, AlertEmphasis)> + 'a {
        let alerts = self.alerts;
        alerts
            .iter()
            .map(|alert| (alert, AlertEmphasis::from(alert.severity)))
    }
}

pub fn aggregate(alerts: &[Alert]) -> AlertDigest<'_> {
    AlertDigest::new(alerts)
}
