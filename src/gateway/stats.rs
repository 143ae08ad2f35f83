//! Aggregate usage statistics reported by the backend.
//!
//! The backend's stats document nests the numbers we show under
//! `performance` and `feedback`. Decoding is deliberately lenient: any field
//! that is missing or has an unexpected type becomes zero, so a partial
//! document still renders as `0`, `"0%"` and `"0.0"`.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageStats {
    pub total_operations: u64,
    /// Percentage, 0–100.
    pub success_rate: f64,
    pub total_feedback: u64,
    pub average_rating: f64,
}

impl UsageStats {
    /// Decode from the backend's `/api/stats` document.
    pub fn from_document(doc: &Value) -> Self {
        Self {
            total_operations: count_at(doc, "/performance/total_operations"),
            success_rate: float_at(doc, "/performance/success_rate"),
            total_feedback: count_at(doc, "/feedback/total_feedback"),
            average_rating: float_at(doc, "/feedback/average_rating"),
        }
    }

    pub fn total_operations_label(&self) -> String {
        self.total_operations.to_string()
    }

    /// Rounded to the nearest whole percent, e.g. `"87%"`.
    pub fn success_rate_label(&self) -> String {
        format!("{}%", self.success_rate.round() as i64)
    }

    pub fn total_feedback_label(&self) -> String {
        self.total_feedback.to_string()
    }

    /// One decimal place, e.g. `"4.2"`.
    pub fn average_rating_label(&self) -> String {
        format!("{:.1}", self.average_rating)
    }
}

fn count_at(doc: &Value, pointer: &str) -> u64 {
    match doc.pointer(pointer) {
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        None => 0,
    }
}

fn float_at(doc: &Value, pointer: &str) -> f64 {
    doc.pointer(pointer)
        .and_then(Value::as_f64)
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_full_document() {
        let doc = json!({
            "performance": { "total_operations": 42, "success_rate": 87.6, "by_provider": {} },
            "feedback": { "total_feedback": 9, "average_rating": 4.24 },
            "knowledge_base": { "entries": 3 }
        });
        let stats = UsageStats::from_document(&doc);
        assert_eq!(stats.total_operations, 42);
        assert_eq!(stats.total_feedback, 9);
        assert_eq!(stats.total_operations_label(), "42");
        assert_eq!(stats.success_rate_label(), "88%");
        assert_eq!(stats.total_feedback_label(), "9");
        assert_eq!(stats.average_rating_label(), "4.2");
    }

    #[test]
    fn missing_sections_render_defaults() {
        let stats = UsageStats::from_document(&json!({}));
        assert_eq!(stats, UsageStats::default());
        assert_eq!(stats.total_operations_label(), "0");
        assert_eq!(stats.success_rate_label(), "0%");
        assert_eq!(stats.total_feedback_label(), "0");
        assert_eq!(stats.average_rating_label(), "0.0");
    }

    #[test]
    fn ill_typed_fields_degrade_to_zero() {
        let doc = json!({
            "performance": { "total_operations": "many", "success_rate": null },
            "feedback": "unavailable"
        });
        let stats = UsageStats::from_document(&doc);
        assert_eq!(stats, UsageStats::default());
    }

    #[test]
    fn non_object_document_is_all_zero() {
        assert_eq!(UsageStats::from_document(&json!([1, 2, 3])), UsageStats::default());
        assert_eq!(UsageStats::from_document(&Value::Null), UsageStats::default());
    }

    #[test]
    fn float_counts_are_truncated() {
        let doc = json!({ "performance": { "total_operations": 12.0 } });
        assert_eq!(UsageStats::from_document(&doc).total_operations, 12);
    }
}
