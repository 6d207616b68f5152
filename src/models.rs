use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Select value that switches the category input to free text.
pub const CUSTOM_CATEGORY: &str = "__custom__";

/// A single income or expense record. Owned by the backend; the client only
/// ever holds a possibly-stale copy per screen.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Path segment on the backend: `/income` or `/expense`.
    pub fn path(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Normalized category sets, one per transaction kind. Built at the API
/// boundary from whichever wire shape the backend happens to return.
#[derive(Clone, PartialEq, Default)]
pub struct CategorySet {
    pub income: Vec<Category>,
    pub expense: Vec<Category>,
}

impl CategorySet {
    pub fn for_kind(&self, kind: TransactionKind) -> &[Category] {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expense,
        }
    }
}

/// The categories endpoint has shipped two shapes: `{income: [...],
/// expense: [...]}` and a single flat list carrying a `type` field on each
/// entry. Both collapse into [`CategorySet`] here and nowhere else.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum CategoriesResponse {
    Grouped {
        #[serde(default)]
        income: Vec<Category>,
        #[serde(default)]
        expense: Vec<Category>,
    },
    Flat(Vec<Category>),
}

impl From<CategoriesResponse> for CategorySet {
    fn from(response: CategoriesResponse) -> Self {
        match response {
            CategoriesResponse::Grouped { income, expense } => CategorySet { income, expense },
            CategoriesResponse::Flat(all) => {
                let (income, expense) = all
                    .into_iter()
                    .partition(|c| c.kind.eq_ignore_ascii_case("income"));
                CategorySet { income, expense }
            }
        }
    }
}

/// Predefined sets used when the categories fetch fails, mirroring the
/// backend's built-in list so the forms stay usable.
pub fn default_categories() -> CategorySet {
    fn cat(name: &str, emoji: &str, color: &str, kind: &str) -> Category {
        Category {
            name: name.to_string(),
            emoji: emoji.to_string(),
            color: color.to_string(),
            kind: kind.to_string(),
        }
    }

    CategorySet {
        income: vec![
            cat("Salary", "💰", "#28a745", "income"),
            cat("Freelance", "💻", "#17a2b8", "income"),
            cat("Investments", "📈", "#fd7e14", "income"),
            cat("Gifts", "🎁", "#e83e8c", "income"),
            cat("Refunds", "↩️", "#6f42c1", "income"),
            cat("Other", "💲", "#6c757d", "income"),
        ],
        expense: vec![
            cat("Housing", "🏠", "#dc3545", "expense"),
            cat("Food", "🍔", "#fd7e14", "expense"),
            cat("Transportation", "🚗", "#007bff", "expense"),
            cat("Entertainment", "🎬", "#6f42c1", "expense"),
            cat("Shopping", "🛍️", "#e83e8c", "expense"),
            cat("Utilities", "💡", "#ffc107", "expense"),
            cat("Healthcare", "🏥", "#20c997", "expense"),
            cat("Education", "📚", "#17a2b8", "expense"),
            cat("Other", "💳", "#6c757d", "expense"),
        ],
    }
}

/// Keyword-based emoji for ad-hoc categories typed into the custom field.
pub fn emoji_for(category: &str, kind: TransactionKind) -> &'static str {
    let text = category.trim().to_lowercase();
    if text.is_empty() {
        return match kind {
            TransactionKind::Income => "💰",
            TransactionKind::Expense => "💳",
        };
    }

    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

    match kind {
        TransactionKind::Income => {
            if has(&["salary", "wage", "pay"]) {
                "💰"
            } else if has(&["freelance", "contract"]) {
                "💻"
            } else if has(&["invest", "stock", "dividend"]) {
                "📈"
            } else if has(&["gift", "present"]) {
                "🎁"
            } else if has(&["refund", "return", "cashback"]) {
                "↩️"
            } else if has(&["bonus"]) {
                "🏆"
            } else if has(&["rent", "lease"]) {
                "🏢"
            } else if has(&["sell", "sale"]) {
                "💸"
            } else if has(&["interest"]) {
                "🏦"
            } else if has(&["business"]) {
                "💼"
            } else {
                "💲"
            }
        }
        TransactionKind::Expense => {
            if has(&["rent", "house", "mortgage", "home"]) {
                "🏠"
            } else if has(&["food", "grocery", "restaurant", "meal"]) {
                "🍔"
            } else if has(&["car", "gas", "fuel", "transport"]) {
                "🚗"
            } else if has(&["movie", "entertainment", "game"]) {
                "🎬"
            } else if has(&["shop", "cloth", "mall"]) {
                "🛍️"
            } else if has(&["bill", "utility", "electric", "water"]) {
                "💡"
            } else if has(&["health", "doctor", "medical", "hospital"]) {
                "🏥"
            } else if has(&["edu", "school", "book", "course"]) {
                "📚"
            } else if has(&["tech", "phone", "computer"]) {
                "📱"
            } else if has(&["insur"]) {
                "🔒"
            } else if has(&["tax"]) {
                "📝"
            } else {
                "💳"
            }
        }
    }
}

/// Resolve the category actually submitted from the select value plus the
/// free-text field. The sentinel maps to the trimmed custom text.
pub fn resolve_category(selected: &str, custom: &str) -> String {
    if selected == CUSTOM_CATEGORY {
        custom.trim().to_string()
    } else {
        selected.to_string()
    }
}

#[derive(Clone, PartialEq, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Server-computed aggregate for a date range. Every field is defaulted so a
/// partial body renders as zeros/empty instead of failing to decode.
#[derive(Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub income_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
    pub recent_incomes: Vec<Transaction>,
    pub recent_expenses: Vec<Transaction>,
}

pub const RECENT_LIMIT: usize = 10;

/// Merge the recent income and expense lists into one view, newest first,
/// capped at [`RECENT_LIMIT`] entries across both kinds.
pub fn merge_recent(
    incomes: &[Transaction],
    expenses: &[Transaction],
) -> Vec<(TransactionKind, Transaction)> {
    let mut merged: Vec<(TransactionKind, Transaction)> = incomes
        .iter()
        .cloned()
        .map(|t| (TransactionKind::Income, t))
        .chain(
            expenses
                .iter()
                .cloned()
                .map(|t| (TransactionKind::Expense, t)),
        )
        .collect();
    merged.sort_by(|a, b| b.1.date.cmp(&a.1.date));
    merged.truncate(RECENT_LIMIT);
    merged
}

/// Parse a positive amount with at most two decimal places from form input.
pub fn parse_amount(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Amount is required.".to_string());
    }
    if let Some((_, fraction)) = trimmed.split_once('.') {
        if fraction.len() > 2 {
            return Err("Amount can have at most two decimal places.".to_string());
        }
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value > 0.0 => Ok(value),
        Ok(_) => Err("Amount must be a positive number.".to_string()),
        Err(_) => Err("Amount must be a number.".to_string()),
    }
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().rev().collect();
    let mut out = Vec::new();
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// Two-decimal currency display with thousands separators, e.g. `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as i64;
    let whole = group_thousands(&(cents / 100).to_string());
    format!("{}${}.{:02}", sign, whole, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: &str, amount: f64) -> Transaction {
        Transaction {
            id: None,
            date: date.parse().unwrap(),
            category: "Other".to_string(),
            amount,
            description: None,
            emoji: None,
        }
    }

    #[test]
    fn total_is_sum_of_loaded_list() {
        let list = vec![tx("2025-01-05", 10.00), tx("2025-01-07", 25.50)];
        let total: f64 = list.iter().map(|t| t.amount).sum();
        assert_eq!(format_currency(total), "$35.50");
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-987654.32), "-$987,654.32");
    }

    #[test]
    fn amount_round_trips_through_json() {
        let created = tx("2025-02-01", 42.5);
        let json = serde_json::to_string(&created).unwrap();
        let fetched: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(fetched.amount, 42.5);
    }

    #[test]
    fn parse_amount_accepts_two_decimals() {
        assert_eq!(parse_amount("42.5"), Ok(42.5));
        assert_eq!(parse_amount(" 10.00 "), Ok(10.0));
        assert_eq!(parse_amount("7"), Ok(7.0));
    }

    #[test]
    fn parse_amount_rejects_bad_input() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("3.141").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn merge_recent_caps_at_ten_sorted_desc() {
        let incomes: Vec<Transaction> = (1..=7)
            .map(|d| tx(&format!("2025-03-{:02}", d * 2), 1.0))
            .collect();
        let expenses: Vec<Transaction> = (1..=7)
            .map(|d| tx(&format!("2025-03-{:02}", d * 2 + 1), 1.0))
            .collect();

        let merged = merge_recent(&incomes, &expenses);
        assert_eq!(merged.len(), 10);
        for pair in merged.windows(2) {
            assert!(pair[0].1.date >= pair[1].1.date);
        }
        assert!(merged.iter().any(|(k, _)| *k == TransactionKind::Income));
        assert!(merged.iter().any(|(k, _)| *k == TransactionKind::Expense));
    }

    #[test]
    fn custom_category_is_trimmed() {
        assert_eq!(resolve_category(CUSTOM_CATEGORY, "  Side Gig  "), "Side Gig");
        assert_eq!(resolve_category("Salary", "ignored"), "Salary");
    }

    #[test]
    fn categories_normalize_from_grouped_shape() {
        let raw = r#"{"income":[{"name":"Salary","type":"income"}],
                      "expense":[{"name":"Food","type":"expense"}]}"#;
        let set: CategorySet = serde_json::from_str::<CategoriesResponse>(raw)
            .unwrap()
            .into();
        assert_eq!(set.income.len(), 1);
        assert_eq!(set.expense.len(), 1);
        assert_eq!(set.income[0].name, "Salary");
    }

    #[test]
    fn categories_normalize_from_flat_shape() {
        let raw = r#"[{"name":"Salary","type":"income"},
                      {"name":"Food","type":"expense"},
                      {"name":"Rent","type":"expense"}]"#;
        let set: CategorySet = serde_json::from_str::<CategoriesResponse>(raw)
            .unwrap()
            .into();
        assert_eq!(set.income.len(), 1);
        assert_eq!(set.expense.len(), 2);
    }

    #[test]
    fn emoji_heuristic_matches_keywords() {
        assert_eq!(emoji_for("Monthly Salary", TransactionKind::Income), "💰");
        assert_eq!(emoji_for("Grocery run", TransactionKind::Expense), "🍔");
        assert_eq!(emoji_for("", TransactionKind::Expense), "💳");
        assert_eq!(emoji_for("Side Gig", TransactionKind::Income), "💲");
    }

    #[test]
    fn partial_summary_body_decodes_with_defaults() {
        let summary: DashboardSummary =
            serde_json::from_str(r#"{"totalIncome": 120.0}"#).unwrap();
        assert_eq!(summary.total_income, 120.0);
        assert_eq!(summary.balance, 0.0);
        assert!(summary.recent_incomes.is_empty());
    }
}
