use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vendor performance dimension that can be graded or used as a tier requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ResponseRate,
    OnTimeDelivery,
    CustomerSatisfaction,
    ReturnRate,
    OrderAccuracy,
    Communication,
    TotalSales,
    DisputeRate,
    PaymentCompliance,
}

impl MetricKind {
    pub const ALL: [MetricKind; 9] = [
        MetricKind::ResponseRate,
        MetricKind::OnTimeDelivery,
        MetricKind::CustomerSatisfaction,
        MetricKind::ReturnRate,
        MetricKind::OrderAccuracy,
        MetricKind::Communication,
        MetricKind::TotalSales,
        MetricKind::DisputeRate,
        MetricKind::PaymentCompliance,
    ];

    /// Snake-case key used in JSON, CSV headers and profile files.
    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::ResponseRate => "response_rate",
            MetricKind::OnTimeDelivery => "on_time_delivery",
            MetricKind::CustomerSatisfaction => "customer_satisfaction",
            MetricKind::ReturnRate => "return_rate",
            MetricKind::OrderAccuracy => "order_accuracy",
            MetricKind::Communication => "communication",
            MetricKind::TotalSales => "total_sales",
            MetricKind::DisputeRate => "dispute_rate",
            MetricKind::PaymentCompliance => "payment_compliance",
        }
    }

    /// True for metrics where lower values are better.
    pub fn is_inverse(&self) -> bool {
        matches!(self, MetricKind::ReturnRate | MetricKind::DisputeRate)
    }

    /// True for metrics every vendor record must carry.
    pub fn is_required(&self) -> bool {
        !matches!(self, MetricKind::DisputeRate | MetricKind::PaymentCompliance)
    }

    pub fn scale(&self) -> MetricScale {
        match self {
            MetricKind::CustomerSatisfaction | MetricKind::Communication => MetricScale::Rating,
            MetricKind::TotalSales => MetricScale::Amount,
            _ => MetricScale::Percent,
        }
    }

    /// Accepts keys and display labels in any case, with spaces or hyphens.
    pub fn from_str_loose(s: &str) -> Option<MetricKind> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        let key = key.trim_end_matches("_pct").trim_end_matches("_percent");
        match key {
            "response_rate" | "response" => Some(MetricKind::ResponseRate),
            "on_time_delivery" | "ontime_delivery" | "on_time" => Some(MetricKind::OnTimeDelivery),
            "customer_satisfaction" | "satisfaction" | "rating" => {
                Some(MetricKind::CustomerSatisfaction)
            }
            "return_rate" | "returns" => Some(MetricKind::ReturnRate),
            "order_accuracy" | "accuracy" => Some(MetricKind::OrderAccuracy),
            "communication" => Some(MetricKind::Communication),
            "total_sales" | "sales" => Some(MetricKind::TotalSales),
            "dispute_rate" | "disputes" => Some(MetricKind::DisputeRate),
            "payment_compliance" => Some(MetricKind::PaymentCompliance),
            _ => None,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetricKind::ResponseRate => "Response rate",
            MetricKind::OnTimeDelivery => "On-time delivery",
            MetricKind::CustomerSatisfaction => "Customer satisfaction",
            MetricKind::ReturnRate => "Return rate",
            MetricKind::OrderAccuracy => "Order accuracy",
            MetricKind::Communication => "Communication",
            MetricKind::TotalSales => "Total sales",
            MetricKind::DisputeRate => "Dispute rate",
            MetricKind::PaymentCompliance => "Payment compliance",
        };
        write!(f, "{label}")
    }
}

/// Value domain of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricScale {
    /// Percentage in [0, 100].
    Percent,
    /// Rating in [0, 5].
    Rating,
    /// Non-negative monetary amount, unbounded above.
    Amount,
}

impl MetricScale {
    pub fn min(&self) -> Decimal {
        Decimal::ZERO
    }

    pub fn max(&self) -> Option<Decimal> {
        match self {
            MetricScale::Percent => Some(Decimal::ONE_HUNDRED),
            MetricScale::Rating => Some(Decimal::from(5)),
            MetricScale::Amount => None,
        }
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min() && self.max().map_or(true, |max| value <= max)
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricScale::Percent => "%",
            MetricScale::Rating => "/ 5",
            MetricScale::Amount => "",
        }
    }
}

/// Performance metrics for one vendor, supplied fresh for every evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorMetrics {
    pub response_rate: Decimal,
    pub on_time_delivery: Decimal,
    pub customer_satisfaction: Decimal,
    pub return_rate: Decimal,
    pub order_accuracy: Decimal,
    pub communication: Decimal,
    pub total_sales: Decimal,
    /// Share of orders that escalated to a dispute. Only used by tier requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispute_rate: Option<Decimal>,
    /// Share of payouts settled without compliance holds. Only used by tier requirements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_compliance: Option<Decimal>,
}

impl VendorMetrics {
    /// Value of a metric, or `None` if an optional metric was not supplied.
    pub fn get(&self, kind: MetricKind) -> Option<Decimal> {
        match kind {
            MetricKind::ResponseRate => Some(self.response_rate),
            MetricKind::OnTimeDelivery => Some(self.on_time_delivery),
            MetricKind::CustomerSatisfaction => Some(self.customer_satisfaction),
            MetricKind::ReturnRate => Some(self.return_rate),
            MetricKind::OrderAccuracy => Some(self.order_accuracy),
            MetricKind::Communication => Some(self.communication),
            MetricKind::TotalSales => Some(self.total_sales),
            MetricKind::DisputeRate => self.dispute_rate,
            MetricKind::PaymentCompliance => self.payment_compliance,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: Decimal) {
        match kind {
            MetricKind::ResponseRate => self.response_rate = value,
            MetricKind::OnTimeDelivery => self.on_time_delivery = value,
            MetricKind::CustomerSatisfaction => self.customer_satisfaction = value,
            MetricKind::ReturnRate => self.return_rate = value,
            MetricKind::OrderAccuracy => self.order_accuracy = value,
            MetricKind::Communication => self.communication = value,
            MetricKind::TotalSales => self.total_sales = value,
            MetricKind::DisputeRate => self.dispute_rate = Some(value),
            MetricKind::PaymentCompliance => self.payment_compliance = Some(value),
        }
    }

    /// Clamp every metric into its valid range.
    ///
    /// A malformed value must not abort a dashboard render, so out-of-range
    /// values are pulled to the nearest bound and reported back as
    /// adjustments instead of being rejected.
    pub fn sanitize(&self) -> (VendorMetrics, Vec<InputAdjustment>) {
        let mut clean = self.clone();
        let mut adjustments = Vec::new();

        for kind in MetricKind::ALL {
            let Some(value) = self.get(kind) else {
                continue;
            };
            let scale = kind.scale();
            if scale.contains(value) {
                continue;
            }

            let (adjusted, reason) = if value < scale.min() {
                (scale.min(), AdjustmentReason::BelowRange)
            } else {
                (scale.max().unwrap_or(value), AdjustmentReason::AboveRange)
            };

            tracing::warn!(
                metric = kind.key(),
                original = %value,
                adjusted = %adjusted,
                "clamped out-of-range metric value"
            );
            clean.set(kind, adjusted);
            adjustments.push(InputAdjustment {
                metric: kind,
                original: value.to_string(),
                adjusted,
                reason,
            });
        }

        (clean, adjustments)
    }
}

/// One vendor's identity and metrics, the unit of a batch evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorRecord {
    pub vendor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub metrics: VendorMetrics,
    /// Corrections already applied while parsing the raw input.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<InputAdjustment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    BelowRange,
    AboveRange,
    NonFinite,
    Missing,
}

impl fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentReason::BelowRange => write!(f, "below valid range"),
            AdjustmentReason::AboveRange => write!(f, "above valid range"),
            AdjustmentReason::NonFinite => write!(f, "not a finite number"),
            AdjustmentReason::Missing => write!(f, "missing value"),
        }
    }
}

/// A bad input value that was replaced rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputAdjustment {
    pub metric: MetricKind,
    /// The value as it was received.
    pub original: String,
    pub adjusted: Decimal,
    pub reason: AdjustmentReason,
}

impl fmt::Display for InputAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' {} -> {}",
            self.metric, self.original, self.reason, self.adjusted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn metrics() -> VendorMetrics {
        VendorMetrics {
            response_rate: dec!(98),
            on_time_delivery: dec!(96),
            customer_satisfaction: dec!(4.8),
            return_rate: dec!(2.5),
            order_accuracy: dec!(97),
            communication: dec!(4.9),
            total_sales: dec!(12500),
            dispute_rate: None,
            payment_compliance: Some(dec!(99)),
        }
    }

    #[test]
    fn test_sanitize_leaves_valid_metrics_alone() {
        let (clean, adjustments) = metrics().sanitize();
        assert_eq!(clean, metrics());
        assert!(adjustments.is_empty());
    }

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let mut m = metrics();
        m.response_rate = dec!(104);
        m.customer_satisfaction = dec!(7);
        m.total_sales = dec!(-50);
        m.dispute_rate = Some(dec!(-1));

        let (clean, adjustments) = m.sanitize();
        assert_eq!(clean.response_rate, dec!(100));
        assert_eq!(clean.customer_satisfaction, dec!(5));
        assert_eq!(clean.total_sales, dec!(0));
        assert_eq!(clean.dispute_rate, Some(dec!(0)));
        assert_eq!(adjustments.len(), 4);

        let sales = adjustments
            .iter()
            .find(|a| a.metric == MetricKind::TotalSales)
            .unwrap();
        assert_eq!(sales.reason, AdjustmentReason::BelowRange);
        assert_eq!(sales.original, "-50");
    }

    #[test]
    fn test_large_sales_are_not_clamped() {
        let mut m = metrics();
        m.total_sales = dec!(98000000);
        let (_, adjustments) = m.sanitize();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn test_inverse_metrics() {
        assert!(MetricKind::ReturnRate.is_inverse());
        assert!(MetricKind::DisputeRate.is_inverse());
        assert!(!MetricKind::TotalSales.is_inverse());
        assert!(!MetricKind::CustomerSatisfaction.is_inverse());
    }

    #[test]
    fn test_from_str_loose() {
        assert_eq!(
            MetricKind::from_str_loose("On-Time Delivery"),
            Some(MetricKind::OnTimeDelivery)
        );
        assert_eq!(
            MetricKind::from_str_loose(" return_rate_pct "),
            Some(MetricKind::ReturnRate)
        );
        assert_eq!(MetricKind::from_str_loose("rating"), Some(MetricKind::CustomerSatisfaction));
        assert_eq!(MetricKind::from_str_loose("vendor_id"), None);
    }

    #[test]
    fn test_key_round_trips_through_loose_parse() {
        for kind in MetricKind::ALL {
            assert_eq!(MetricKind::from_str_loose(kind.key()), Some(kind));
        }
    }

    #[test]
    fn test_metrics_json_uses_string_decimals() {
        let json = r#"{
            "response_rate": "98",
            "on_time_delivery": "96",
            "customer_satisfaction": "4.8",
            "return_rate": "2.5",
            "order_accuracy": "97",
            "communication": "4.9",
            "total_sales": "12500"
        }"#;
        let m: VendorMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(m.customer_satisfaction, dec!(4.8));
        assert_eq!(m.dispute_rate, None);
    }
}
