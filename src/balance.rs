//! Folds transactions into per-currency balances and derives the monthly
//! summary figures shown on the dashboard.

use serde::{Serialize, ser::SerializeMap};
use time::OffsetDateTime;

use crate::{
    conversion::RateTable,
    models::{Currency, Transaction, TransactionKind},
};

/// Signed running totals per currency, derived from the full transaction set
/// and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Balances {
    totals: [f64; Currency::ALL.len()],
}

impl Balances {
    /// The running total for `currency`.
    pub fn get(&self, currency: Currency) -> f64 {
        self.totals[currency.index()]
    }

    /// Project the multi-currency balance into a single display currency.
    ///
    /// Sums the conversion of every bucket into `target`.
    pub fn total_in(&self, target: Currency, rates: &RateTable) -> f64 {
        Currency::ALL
            .iter()
            .map(|&currency| rates.convert(self.get(currency), currency, target))
            .sum()
    }

    fn apply(&mut self, transaction: &Transaction) {
        let signed = match transaction.kind() {
            TransactionKind::Income => transaction.amount(),
            TransactionKind::Expense => -transaction.amount(),
        };

        self.totals[transaction.currency().index()] += signed;
    }
}

impl Serialize for Balances {
    /// Serializes as an object keyed by currency code, e.g.
    /// `{"USD": 12.5, "AOA": 0.0, "EUR": -3.0}`.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Currency::ALL.len()))?;
        for currency in Currency::ALL {
            map.serialize_entry(currency.code(), &self.get(currency))?;
        }
        map.end()
    }
}

/// Fold `transactions` into per-currency running totals.
///
/// Every known currency starts at zero; incomes add and expenses subtract
/// into the bucket of their own currency. No conversion happens during
/// accumulation, so the result does not depend on the input order.
pub fn aggregate(transactions: &[Transaction]) -> Balances {
    let mut balances = Balances::default();

    for transaction in transactions {
        balances.apply(transaction);
    }

    balances
}

/// The keyword list used to classify an expense as essential.
///
/// A description matches when it contains any keyword, case-insensitively.
/// Injected into [AppState](crate::AppState) rather than kept as a global.
#[derive(Debug, Clone, PartialEq)]
pub struct EssentialKeywords(Vec<String>);

impl EssentialKeywords {
    /// Build a list from explicit keywords.
    pub fn new(keywords: Vec<String>) -> Self {
        Self(keywords.into_iter().map(|k| k.to_lowercase()).collect())
    }

    /// Whether `description` mentions any essential-expense keyword.
    pub fn matches(&self, description: &str) -> bool {
        let description = description.to_lowercase();

        self.0.iter().any(|keyword| description.contains(keyword))
    }
}

impl Default for EssentialKeywords {
    /// The application's built-in keyword list.
    fn default() -> Self {
        Self::new(
            [
                "renda",
                "salario",
                "salário",
                "aluguel",
                "agua",
                "água",
                "energia",
                "internet",
                "saude",
                "saúde",
                "comida",
                "transporte",
                "escola",
                "farmacia",
                "farmácia",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }
}

/// Derived figures for the current calendar month, all converted into the
/// display currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Total income this month.
    pub income: f64,
    /// Total expenses this month.
    pub outcome: f64,
    /// The subset of expenses whose description matches an essential
    /// keyword.
    pub essential_expenses: f64,
    /// `(income - outcome) / income * 100` when income is positive, else 0.
    pub savings_rate: f64,
}

impl MonthlySummary {
    /// Compute the summary over `transactions` for the month containing
    /// `now`.
    ///
    /// A pure function: the caller supplies the clock, the rate table and
    /// the keyword list.
    pub fn compute(
        transactions: &[Transaction],
        display: Currency,
        rates: &RateTable,
        keywords: &EssentialKeywords,
        now: OffsetDateTime,
    ) -> Self {
        let monthly: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| {
                t.created_at().month() == now.month() && t.created_at().year() == now.year()
            })
            .collect();

        let converted = |transaction: &Transaction| {
            rates.convert(transaction.amount(), transaction.currency(), display)
        };

        let income: f64 = monthly
            .iter()
            .filter(|t| t.kind() == TransactionKind::Income)
            .map(|t| converted(t))
            .sum();

        let outcome: f64 = monthly
            .iter()
            .filter(|t| t.kind() == TransactionKind::Expense)
            .map(|t| converted(t))
            .sum();

        let essential_expenses: f64 = monthly
            .iter()
            .filter(|t| t.kind() == TransactionKind::Expense && keywords.matches(t.description()))
            .map(|t| converted(t))
            .sum();

        let savings_rate = if income > 0.0 {
            (income - outcome) / income * 100.0
        } else {
            0.0
        };

        Self {
            income,
            outcome,
            essential_expenses,
            savings_rate,
        }
    }
}

#[cfg(test)]
mod balance_tests {
    use time::macros::datetime;

    use crate::{
        conversion::RateTable,
        models::{Currency, Transaction, TransactionKind},
    };

    use super::{EssentialKeywords, MonthlySummary, aggregate};

    fn transaction(
        id: i64,
        kind: TransactionKind,
        amount: f64,
        description: &str,
        currency: Currency,
    ) -> Transaction {
        Transaction::new(
            id,
            kind,
            amount,
            description.to_owned(),
            currency,
            None,
            datetime!(2026-03-10 09:30:00 UTC),
        )
    }

    #[test]
    fn aggregate_starts_every_currency_at_zero() {
        let balances = aggregate(&[]);

        for currency in Currency::ALL {
            assert_eq!(balances.get(currency), 0.0);
        }
    }

    #[test]
    fn aggregate_adds_income_and_subtracts_expenses() {
        let transactions = vec![
            transaction(1, TransactionKind::Income, 100.0, "Salário", Currency::Usd),
            transaction(2, TransactionKind::Expense, 40.0, "Comida", Currency::Usd),
            transaction(3, TransactionKind::Expense, 500.0, "Renda", Currency::Aoa),
        ];

        let balances = aggregate(&transactions);

        assert_eq!(balances.get(Currency::Usd), 60.0);
        assert_eq!(balances.get(Currency::Aoa), -500.0);
        assert_eq!(balances.get(Currency::Eur), 0.0);
    }

    #[test]
    fn aggregate_is_order_independent() {
        let mut transactions = vec![
            transaction(1, TransactionKind::Income, 10.0, "a", Currency::Usd),
            transaction(2, TransactionKind::Expense, 2.5, "b", Currency::Eur),
            transaction(3, TransactionKind::Income, 7.0, "c", Currency::Aoa),
            transaction(4, TransactionKind::Expense, 4.0, "d", Currency::Usd),
        ];

        let forwards = aggregate(&transactions);
        transactions.reverse();
        let backwards = aggregate(&transactions);
        transactions.swap(0, 2);
        let shuffled = aggregate(&transactions);

        assert_eq!(forwards, backwards);
        assert_eq!(forwards, shuffled);
    }

    #[test]
    fn total_in_converts_every_bucket() {
        let transactions = vec![
            transaction(1, TransactionKind::Income, 100.0, "Salário", Currency::Usd),
            transaction(2, TransactionKind::Income, 50.0, "Venda", Currency::Eur),
        ];
        let rates = RateTable::default();

        let total = aggregate(&transactions).total_in(Currency::Usd, &rates);

        assert_eq!(total, 100.0 + 50.0 * 1.09);
    }

    #[test]
    fn serializes_as_currency_keyed_object() {
        let transactions = vec![transaction(
            1,
            TransactionKind::Income,
            12.5,
            "Venda",
            Currency::Usd,
        )];

        let json = serde_json::to_value(aggregate(&transactions)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"USD": 12.5, "AOA": 0.0, "EUR": 0.0})
        );
    }

    #[test]
    fn essential_keywords_match_case_insensitive_substrings() {
        let keywords = EssentialKeywords::default();

        assert!(keywords.matches("Salário de Março"));
        assert!(keywords.matches("FARMÁCIA central"));
        assert!(keywords.matches("pagamento internet"));
        assert!(!keywords.matches("cinema"));
    }

    #[test]
    fn monthly_summary_only_counts_the_current_month() {
        let now = datetime!(2026-03-15 12:00:00 UTC);
        let in_month = Transaction::new(
            1,
            TransactionKind::Income,
            100.0,
            "Salário".to_owned(),
            Currency::Usd,
            None,
            datetime!(2026-03-01 08:00:00 UTC),
        );
        let previous_month = Transaction::new(
            2,
            TransactionKind::Income,
            900.0,
            "Salário".to_owned(),
            Currency::Usd,
            None,
            datetime!(2026-02-27 08:00:00 UTC),
        );
        let previous_year = Transaction::new(
            3,
            TransactionKind::Expense,
            900.0,
            "Renda".to_owned(),
            Currency::Usd,
            None,
            datetime!(2025-03-02 08:00:00 UTC),
        );

        let summary = MonthlySummary::compute(
            &[in_month, previous_month, previous_year],
            Currency::Usd,
            &RateTable::default(),
            &EssentialKeywords::default(),
            now,
        );

        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.outcome, 0.0);
    }

    #[test]
    fn monthly_summary_computes_savings_rate() {
        let now = datetime!(2026-03-15 12:00:00 UTC);
        let transactions = vec![
            transaction(1, TransactionKind::Income, 200.0, "Salário", Currency::Usd),
            transaction(2, TransactionKind::Expense, 50.0, "Comida", Currency::Usd),
            transaction(3, TransactionKind::Expense, 30.0, "Cinema", Currency::Usd),
        ];

        let summary = MonthlySummary::compute(
            &transactions,
            Currency::Usd,
            &RateTable::default(),
            &EssentialKeywords::default(),
            now,
        );

        assert_eq!(summary.income, 200.0);
        assert_eq!(summary.outcome, 80.0);
        assert_eq!(summary.essential_expenses, 50.0);
        assert_eq!(summary.savings_rate, 60.0);
    }

    #[test]
    fn savings_rate_is_zero_without_income() {
        let now = datetime!(2026-03-15 12:00:00 UTC);
        let transactions = vec![transaction(
            1,
            TransactionKind::Expense,
            50.0,
            "Comida",
            Currency::Usd,
        )];

        let summary = MonthlySummary::compute(
            &transactions,
            Currency::Usd,
            &RateTable::default(),
            &EssentialKeywords::default(),
            now,
        );

        assert_eq!(summary.savings_rate, 0.0);
    }
}
