use chrono::NaiveDateTime;

use crate::alerts::AlertRecord;

/// Chat-style plain text formatter for alerts
pub struct TextFormatter;

impl TextFormatter {
    /// Format an alert as a short chat message
    ///
    /// `detected_at` is supplied by the caller so the output is reproducible.
    pub fn format(alert: &AlertRecord, detected_at: NaiveDateTime) -> String {
        let mut msg = String::with_capacity(512);

        msg.push_str(&format!("{} *PARCEL ALERT*\n\n", alert.severity.icon()));
        msg.push_str(&format!(
            "*{}* detected\n\n",
            alert.alert_type.display_name().to_uppercase()
        ));
        msg.push_str(&format!("📍 *Location:* {}\n", alert.boundary_name));

        match alert.affected_hectares {
            Some(area) => msg.push_str(&format!("📐 *Affected:* {:.1} ha\n", area)),
            None => msg.push_str("📐 *Affected:* N/A\n"),
        }

        msg.push_str(&format!(
            "⏰ *Detected:* {}\n",
            detected_at.format("%Y-%m-%d %H:%M")
        ));
        msg.push_str(&format!(
            "📊 *Severity:* {}\n\n",
            alert.severity.as_str().to_uppercase()
        ));
        msg.push_str(&alert.description);

        msg
    }

    /// One-line subject, e.g. for e-mail
    pub fn subject(alert: &AlertRecord) -> String {
        format!(
            "{} {} Alert - {}",
            alert.severity.icon(),
            alert.alert_type.display_name(),
            alert.boundary_name
        )
    }
}
