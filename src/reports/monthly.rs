//! Monthly Income/Expense Report
//!
//! Groups transaction records by calendar month, sums income and expense per
//! month, and derives the totals and averages shown under the monthly rows.
//! Reports from several sources merge by re-summing per month.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::display::report::{format_bar, format_money};
use crate::error::{StatementError, StatementResult};
use crate::models::{Direction, Money, MonthKey, TransactionRecord};

/// Totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: MonthKey,
    pub income: Money,
    pub expense: Money,
    /// income - expense
    pub net: Money,
}

impl MonthlyTotal {
    fn new(month: MonthKey, income: Money, expense: Money) -> Self {
        Self {
            month,
            income,
            expense,
            net: income - expense,
        }
    }
}

/// Sum and mean of one column across all months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ColumnSummary {
    pub sum: Money,
    /// Absent when the report has no months
    pub mean: Option<Money>,
}

impl ColumnSummary {
    fn over(values: impl Iterator<Item = Money>) -> Self {
        let mut sum = Money::zero();
        let mut count = 0;
        for value in values {
            sum += value;
            count += 1;
        }
        Self {
            sum,
            mean: sum.mean_of(count),
        }
    }
}

/// Summary rows for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    pub income: ColumnSummary,
    pub expense: ColumnSummary,
    pub net: ColumnSummary,
}

/// Per-month totals sorted ascending by month, plus summary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AggregateReport {
    months: Vec<MonthlyTotal>,
    summary: ReportSummary,
}

impl AggregateReport {
    /// Aggregate normalized records by month
    ///
    /// Records whose direction is neither income nor expense are ignored and
    /// never create a month on their own.
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut by_month: BTreeMap<MonthKey, (Money, Money)> = BTreeMap::new();

        for record in records {
            let (income, expense) = match record.direction {
                Direction::Income => (record.amount, Money::zero()),
                Direction::Expense => (Money::zero(), record.amount),
                Direction::Other => continue,
            };
            let entry = by_month
                .entry(record.month())
                .or_insert((Money::zero(), Money::zero()));
            entry.0 += income;
            entry.1 += expense;
        }

        Self::from_month_map(by_month)
    }

    /// Merge reports from several sources
    ///
    /// A month present in several reports has its income and expense summed.
    /// The result does not depend on the order of `reports`.
    pub fn merge<'r>(reports: impl IntoIterator<Item = &'r AggregateReport>) -> Self {
        let mut by_month: BTreeMap<MonthKey, (Money, Money)> = BTreeMap::new();

        for report in reports {
            for total in &report.months {
                let entry = by_month
                    .entry(total.month)
                    .or_insert((Money::zero(), Money::zero()));
                entry.0 += total.income;
                entry.1 += total.expense;
            }
        }

        Self::from_month_map(by_month)
    }

    fn from_month_map(by_month: BTreeMap<MonthKey, (Money, Money)>) -> Self {
        // BTreeMap iteration is already in ascending month order
        let months: Vec<MonthlyTotal> = by_month
            .into_iter()
            .map(|(month, (income, expense))| MonthlyTotal::new(month, income, expense))
            .collect();

        let summary = ReportSummary {
            income: ColumnSummary::over(months.iter().map(|m| m.income)),
            expense: ColumnSummary::over(months.iter().map(|m| m.expense)),
            net: ColumnSummary::over(months.iter().map(|m| m.net)),
        };

        Self { months, summary }
    }

    /// Monthly totals, ascending by month
    pub fn months(&self) -> &[MonthlyTotal] {
        &self.months
    }

    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Totals for a single month, if present
    pub fn month(&self, key: MonthKey) -> Option<&MonthlyTotal> {
        self.months
            .binary_search_by(|m| m.month.cmp(&key))
            .ok()
            .map(|idx| &self.months[idx])
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        if self.is_empty() {
            return "No qualifying transactions found.\n".to_string();
        }

        let money = |m: Money| format_money(m, currency_symbol);
        let optional = |m: Option<Money>| m.map(money).unwrap_or_else(|| "N/A".to_string());

        let mut rows: Vec<TableRow> = self
            .months
            .iter()
            .map(|m| TableRow {
                month: m.month.to_string(),
                income: money(m.income),
                expense: money(m.expense),
                net: money(m.net),
            })
            .collect();

        rows.push(TableRow {
            month: "Total".to_string(),
            income: money(self.summary.income.sum),
            expense: money(self.summary.expense.sum),
            net: money(self.summary.net.sum),
        });
        rows.push(TableRow {
            month: "Average".to_string(),
            income: optional(self.summary.income.mean),
            expense: optional(self.summary.expense.mean),
            net: optional(self.summary.net.mean),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::modern())
            .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

        let mut output = table.to_string();
        output.push('\n');
        output
    }

    /// Text bar chart of income and expense per month
    pub fn format_chart(&self, currency_symbol: &str, width: usize) -> String {
        let max = self
            .months
            .iter()
            .map(|m| m.income.cents().max(m.expense.cents()))
            .max()
            .unwrap_or(0) as f64;

        let mut output = String::new();
        for total in &self.months {
            output.push_str(&format!(
                "{}  income  {} {}\n",
                total.month,
                format_bar(total.income.cents() as f64, max, width),
                format_money(total.income, currency_symbol)
            ));
            output.push_str(&format!(
                "{:7}  expense {} {}\n",
                "",
                format_bar(total.expense.cents() as f64, max, width),
                format_money(total.expense, currency_symbol)
            ));
        }
        output
    }

    /// Export the report to CSV: one row per month, then Total and Average rows
    pub fn export_csv<W: Write>(&self, writer: W) -> StatementResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let export = |e: csv::Error| StatementError::Export(e.to_string());

        csv_writer
            .write_record(["Month", "Income", "Expense", "Net"])
            .map_err(export)?;

        for total in &self.months {
            csv_writer
                .write_record([
                    total.month.to_string(),
                    total.income.to_decimal_string(),
                    total.expense.to_decimal_string(),
                    total.net.to_decimal_string(),
                ])
                .map_err(export)?;
        }

        let summary = &self.summary;
        csv_writer
            .write_record([
                "Total".to_string(),
                summary.income.sum.to_decimal_string(),
                summary.expense.sum.to_decimal_string(),
                summary.net.sum.to_decimal_string(),
            ])
            .map_err(export)?;

        let mean = |m: Option<Money>| m.map(|m| m.to_decimal_string()).unwrap_or_default();
        csv_writer
            .write_record([
                "Average".to_string(),
                mean(summary.income.mean),
                mean(summary.expense.mean),
                mean(summary.net.mean),
            ])
            .map_err(export)?;

        csv_writer
            .flush()
            .map_err(|e| StatementError::Export(e.to_string()))?;
        Ok(())
    }
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, direction: Direction, cents: i64) -> TransactionRecord {
        let timestamp = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        TransactionRecord::new(timestamp, direction, Money::from_cents(cents))
    }

    fn key(s: &str) -> MonthKey {
        MonthKey::parse(s).unwrap()
    }

    fn sample_records() -> Vec<TransactionRecord> {
        vec![
            record("2024-03-01", Direction::Income, 10000),
            record("2024-03-15", Direction::Expense, 4000),
            record("2024-04-01", Direction::Income, 5000),
            record("2024-04-02", Direction::Other, 999900),
        ]
    }

    #[test]
    fn test_aggregate_example() {
        let report = AggregateReport::from_records(&sample_records());

        assert_eq!(
            report.months(),
            &[
                MonthlyTotal {
                    month: key("2024-03"),
                    income: Money::from_cents(10000),
                    expense: Money::from_cents(4000),
                    net: Money::from_cents(6000),
                },
                MonthlyTotal {
                    month: key("2024-04"),
                    income: Money::from_cents(5000),
                    expense: Money::zero(),
                    net: Money::from_cents(5000),
                },
            ]
        );
        assert_eq!(report.summary().income.sum, Money::from_cents(15000));
        assert_eq!(report.summary().income.mean, Some(Money::from_cents(7500)));
        assert_eq!(report.summary().expense.mean, Some(Money::from_cents(2000)));
        assert_eq!(report.summary().net.sum, Money::from_cents(11000));
    }

    #[test]
    fn test_other_only_month_does_not_appear() {
        let records = vec![
            record("2024-01-10", Direction::Other, 500),
            record("2024-02-10", Direction::Expense, 500),
        ];
        let report = AggregateReport::from_records(&records);

        assert_eq!(report.months().len(), 1);
        assert!(report.month(key("2024-01")).is_none());
        assert!(report.month(key("2024-02")).is_some());
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let report = AggregateReport::from_records(&[]);

        assert!(report.is_empty());
        assert_eq!(report.summary().income.sum, Money::zero());
        assert_eq!(report.summary().income.mean, None);
        assert_eq!(report.summary().net.mean, None);
    }

    #[test]
    fn test_months_sorted_across_years() {
        let records = vec![
            record("2024-01-05", Direction::Income, 100),
            record("2023-12-31", Direction::Income, 100),
            record("2023-02-01", Direction::Income, 100),
        ];
        let report = AggregateReport::from_records(&records);
        let months: Vec<String> = report.months().iter().map(|m| m.month.to_string()).collect();

        assert_eq!(months, vec!["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn test_non_negative_inputs_give_non_negative_sums() {
        let records: Vec<_> = (1..=28)
            .map(|day| {
                let direction = if day % 2 == 0 {
                    Direction::Income
                } else {
                    Direction::Expense
                };
                record(&format!("2024-02-{:02}", day), direction, day * 137)
            })
            .collect();
        let report = AggregateReport::from_records(&records);

        for total in report.months() {
            assert!(!total.income.is_negative());
            assert!(!total.expense.is_negative());
        }
    }

    #[test]
    fn test_merge_is_order_independent() {
        let records = sample_records();
        let a = AggregateReport::from_records(&records[..2]);
        let b = AggregateReport::from_records(&records[2..]);

        let ab = AggregateReport::merge([&a, &b]);
        let ba = AggregateReport::merge([&b, &a]);

        assert_eq!(ab, ba);
        assert_eq!(ab, AggregateReport::from_records(&records));
    }

    #[test]
    fn test_merge_same_month_sums() {
        let a = AggregateReport::from_records(&[record("2024-03-01", Direction::Income, 100)]);
        let b = AggregateReport::from_records(&[record("2024-03-20", Direction::Expense, 30)]);
        let merged = AggregateReport::merge([&a, &b]);

        let march = merged.month(key("2024-03")).unwrap();
        assert_eq!(march.income, Money::from_cents(100));
        assert_eq!(march.expense, Money::from_cents(30));
        assert_eq!(march.net, Money::from_cents(70));
    }

    #[test]
    fn test_merge_with_itself_doubles() {
        let a = AggregateReport::from_records(&sample_records());
        let doubled = AggregateReport::merge([&a, &a]);

        for (single, double) in a.months().iter().zip(doubled.months()) {
            assert_eq!(double.month, single.month);
            assert_eq!(double.income.cents(), single.income.cents() * 2);
            assert_eq!(double.expense.cents(), single.expense.cents() * 2);
            assert_eq!(double.net.cents(), single.net.cents() * 2);
        }
        assert_eq!(doubled.months().len(), a.months().len());
    }

    #[test]
    fn test_merge_nothing_is_empty() {
        let merged = AggregateReport::merge(std::iter::empty());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_format_terminal() {
        let report = AggregateReport::from_records(&sample_records());
        let output = report.format_terminal("¥");

        assert!(output.contains("2024-03"));
        assert!(output.contains("¥100.00"));
        assert!(output.contains("¥60.00"));
        assert!(output.contains("Total"));
        assert!(output.contains("¥150.00"));
        assert!(output.contains("Average"));
        assert!(output.contains("¥75.00"));
    }

    #[test]
    fn test_format_terminal_empty() {
        let report = AggregateReport::default();
        assert_eq!(report.format_terminal("¥"), "No qualifying transactions found.\n");
    }

    #[test]
    fn test_format_chart() {
        let report = AggregateReport::from_records(&sample_records());
        let chart = report.format_chart("¥", 10);

        assert_eq!(chart.lines().count(), 4);
        assert!(chart.lines().next().unwrap().contains("██████████"));
    }

    #[test]
    fn test_export_csv() {
        let report = AggregateReport::from_records(&sample_records());
        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();

        let csv = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Month,Income,Expense,Net");
        assert_eq!(lines[1], "2024-03,100.00,40.00,60.00");
        assert_eq!(lines[2], "2024-04,50.00,0.00,50.00");
        assert_eq!(lines[3], "Total,150.00,40.00,110.00");
        assert_eq!(lines[4], "Average,75.00,20.00,55.00");
    }
}
