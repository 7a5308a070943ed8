//! Month-keyed receivables aggregation
//!
//! Every source of expected inflow (ledger payments, simulated installments,
//! manual one-off entries, expanded recurring rules) is folded through the
//! same [`aggregate`] into a [`MonthlyReceivables`] map.

use core_kernel::{Currency, Money, MonthKey};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{error, warn};

use crate::error::LendingError;
use crate::loan::limits;
use crate::schedule::Installment;

/// Anything that contributes an amount to a calendar month
pub trait Receivable {
    fn month_key(&self) -> MonthKey;
    fn amount(&self) -> Money;
}

impl Receivable for Installment {
    fn month_key(&self) -> MonthKey {
        self.month_key
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

/// Summed receivables per calendar month
///
/// Iterates in chronological order; months never added read as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReceivables {
    currency: Currency,
    totals: BTreeMap<MonthKey, Money>,
}

impl MonthlyReceivables {
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            totals: BTreeMap::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Adds `amount` to the month's running total
    ///
    /// Amounts in a different currency are skipped with a warning.
    pub fn add(&mut self, month: MonthKey, amount: Money) {
        if amount.currency() != self.currency {
            warn!(
                month = %month,
                expected = %self.currency,
                actual = %amount.currency(),
                "Skipping receivable in foreign currency"
            );
            return;
        }
        let entry = self
            .totals
            .entry(month)
            .or_insert_with(|| Money::zero(self.currency));
        *entry += amount;
    }

    /// Total for `month`, zero when absent
    pub fn get(&self, month: &MonthKey) -> Money {
        self.totals
            .get(month)
            .copied()
            .unwrap_or_else(|| Money::zero(self.currency))
    }

    pub fn contains(&self, month: &MonthKey) -> bool {
        self.totals.contains_key(month)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, MonthKey, Money> {
        self.totals.iter()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Grand total across all months
    pub fn total(&self) -> Money {
        Money::sum_in(self.currency, self.totals.values())
    }

    /// Folds more receivables into this map
    pub fn extend<'a, R, I>(&mut self, items: I)
    where
        R: Receivable + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        for item in items {
            self.add(item.month_key(), item.amount());
        }
    }
}

impl<'a> IntoIterator for &'a MonthlyReceivables {
    type Item = (&'a MonthKey, &'a Money);
    type IntoIter = btree_map::Iter<'a, MonthKey, Money>;

    fn into_iter(self) -> Self::IntoIter {
        self.totals.iter()
    }
}

/// Folds installment-shaped records into a month-keyed map
///
/// Order-independent: any permutation of `items` yields the same map.
pub fn aggregate<'a, R, I>(currency: Currency, items: I) -> MonthlyReceivables
where
    R: Receivable + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut map = MonthlyReceivables::new(currency);
    map.extend(items);
    map
}

/// A user-declared hypothetical one-off receivable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualReceivable {
    pub month_key: MonthKey,
    pub amount: Money,
    pub description: Option<String>,
}

impl Receivable for ManualReceivable {
    fn month_key(&self) -> MonthKey {
        self.month_key
    }

    fn amount(&self) -> Money {
        self.amount
    }
}

/// Cadence of a recurring injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Monthly,
    Quarterly,
    Annually,
}

impl RecurrenceFrequency {
    /// Months between occurrences
    pub fn step_months(&self) -> u32 {
        match self {
            RecurrenceFrequency::Monthly => 1,
            RecurrenceFrequency::Quarterly => 3,
            RecurrenceFrequency::Annually => 12,
        }
    }
}

impl FromStr for RecurrenceFrequency {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(RecurrenceFrequency::Monthly),
            "quarterly" => Ok(RecurrenceFrequency::Quarterly),
            "annually" | "yearly" => Ok(RecurrenceFrequency::Annually),
            other => Err(LendingError::UnknownRecurrence(other.to_string())),
        }
    }
}

/// A rule that injects the same amount every 1st/3rd/12th month from a start month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringReceivable {
    pub start_month_key: MonthKey,
    pub amount: Money,
    pub frequency: RecurrenceFrequency,
    pub description: Option<String>,
}

impl RecurringReceivable {
    /// Occurrences over `horizon_months` months counted from the start month
    ///
    /// Offset `i` in `0..horizon_months` qualifies when `i % step == 0`, so the
    /// start month itself always qualifies.
    pub fn expand(&self, horizon_months: u32) -> Vec<ManualReceivable> {
        let step = self.frequency.step_months();
        (0..horizon_months)
            .filter(|i| i % step == 0)
            .map(|i| ManualReceivable {
                month_key: self.start_month_key.offset(i as i32),
                amount: self.amount,
                description: self.description.clone(),
            })
            .collect()
    }
}

/// Expands every rule and flattens the occurrences
pub fn expand_recurring(
    rules: &[RecurringReceivable],
    horizon_months: u32,
) -> Vec<ManualReceivable> {
    rules
        .iter()
        .flat_map(|rule| rule.expand(horizon_months))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualReceivableWire {
    month_key: MonthKey,
    #[serde(deserialize_with = "deserialize_amount")]
    amount: Decimal,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecurringReceivableWire {
    start_month_key: MonthKey,
    #[serde(deserialize_with = "deserialize_amount")]
    amount: Decimal,
    frequency: RecurrenceFrequency,
    #[serde(default)]
    description: Option<String>,
}

/// Accepts JSON numbers or numeric strings without going through `f64`
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let text = match &value {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.trim().to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a numeric amount, got {}",
                other
            )))
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| serde::de::Error::custom(format!("invalid amount: {}", text)))
}

/// Entries larger in magnitude than the largest principal are dropped
fn within_limits(month_key: MonthKey, amount: Decimal) -> bool {
    if amount.abs() > limits::MAX_PRINCIPAL {
        warn!(month = %month_key, amount = %amount, "Dropping out-of-range receivable entry");
        return false;
    }
    true
}

/// Parses `[{monthKey, amount, description?}]`
///
/// A malformed batch is logged and treated as empty.
pub fn parse_manual_receivables(json: &str, currency: Currency) -> Vec<ManualReceivable> {
    match serde_json::from_str::<Vec<ManualReceivableWire>>(json) {
        Ok(entries) => entries
            .into_iter()
            .filter(|e| within_limits(e.month_key, e.amount))
            .map(|e| ManualReceivable {
                month_key: e.month_key,
                amount: Money::new(e.amount, currency),
                description: e.description,
            })
            .collect(),
        Err(err) => {
            error!(error = %err, "Discarding malformed manual receivables batch");
            Vec::new()
        }
    }
}

/// Parses `[{startMonthKey, amount, frequency, description?}]`
///
/// A malformed batch is logged and treated as empty.
pub fn parse_recurring_receivables(json: &str, currency: Currency) -> Vec<RecurringReceivable> {
    match serde_json::from_str::<Vec<RecurringReceivableWire>>(json) {
        Ok(entries) => entries
            .into_iter()
            .filter(|e| within_limits(e.start_month_key, e.amount))
            .map(|e| RecurringReceivable {
                start_month_key: e.start_month_key,
                amount: Money::new(e.amount, currency),
                frequency: e.frequency,
                description: e.description,
            })
            .collect(),
        Err(err) => {
            error!(error = %err, "Discarding malformed recurring receivables batch");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::USD)
    }

    #[test]
    fn test_aggregate_sums_same_month() {
        let items = vec![
            Installment::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), usd(dec!(100))),
            Installment::new(NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(), usd(dec!(250))),
            Installment::new(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), usd(dec!(10))),
        ];
        let map = aggregate(Currency::USD, &items);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&key("2025-03")).amount(), dec!(350));
        assert_eq!(map.get(&key("2025-04")).amount(), dec!(10));
        assert!(map.get(&key("2025-05")).is_zero());
        assert_eq!(map.total().amount(), dec!(360));
    }

    #[test]
    fn test_foreign_currency_is_skipped() {
        let mut map = MonthlyReceivables::new(Currency::USD);
        map.add(key("2025-01"), Money::new(dec!(5), Currency::EUR));
        assert!(map.is_empty());
    }

    #[test]
    fn test_recurring_quarterly_expansion() {
        let rule = RecurringReceivable {
            start_month_key: key("2025-11"),
            amount: usd(dec!(500)),
            frequency: RecurrenceFrequency::Quarterly,
            description: None,
        };
        let months: Vec<String> = rule
            .expand(12)
            .iter()
            .map(|r| r.month_key.to_string())
            .collect();
        assert_eq!(months, vec!["2025-11", "2026-02", "2026-05", "2026-08"]);
    }

    #[test]
    fn test_recurring_annual_includes_start_month_only_once_per_year() {
        let rule = RecurringReceivable {
            start_month_key: key("2025-01"),
            amount: usd(dec!(1200)),
            frequency: RecurrenceFrequency::Annually,
            description: Some("bonus".to_string()),
        };
        assert_eq!(rule.expand(12).len(), 1);
        assert_eq!(rule.expand(13).len(), 2);
        assert!(rule.expand(0).is_empty());
    }

    #[test]
    fn test_parse_manual_receivables() {
        let json = r#"[{"monthKey":"2025-06","amount":1000.5,"description":"deposit"},
                       {"monthKey":"2025-07","amount":"20"}]"#;
        let parsed = parse_manual_receivables(json, Currency::USD);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].amount.amount(), dec!(1000.5));
        assert_eq!(parsed[0].description.as_deref(), Some("deposit"));
        assert_eq!(parsed[1].month_key, key("2025-07"));
    }

    #[test]
    fn test_malformed_batch_is_empty() {
        assert!(parse_manual_receivables("not json", Currency::USD).is_empty());
        assert!(parse_manual_receivables(r#"[{"monthKey":"June","amount":1}]"#, Currency::USD).is_empty());
        assert!(parse_recurring_receivables(
            r#"[{"startMonthKey":"2025-01","amount":1,"frequency":"weekly"}]"#,
            Currency::USD
        )
        .is_empty());
    }

    #[test]
    fn test_parse_recurring_receivables() {
        let json = r#"[{"startMonthKey":"2025-01","amount":250,"frequency":"monthly"}]"#;
        let parsed = parse_recurring_receivables(json, Currency::USD);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].frequency, RecurrenceFrequency::Monthly);
        assert_eq!(expand_recurring(&parsed, 6).len(), 6);
    }

    #[test]
    fn test_out_of_range_entries_are_dropped() {
        let json = r#"[{"monthKey":"2025-06","amount":"79000000000000000000000000000"},
                       {"monthKey":"2025-07","amount":20}]"#;
        let parsed = parse_manual_receivables(json, Currency::USD);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].month_key, key("2025-07"));

        let rules = r#"[{"startMonthKey":"2025-01","amount":"-1e20","frequency":"monthly"}]"#;
        assert!(parse_recurring_receivables(rules, Currency::USD).is_empty());
    }
}
