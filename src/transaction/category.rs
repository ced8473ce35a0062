//! Transaction kinds and the fixed category vocabulary for each kind.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether money was spent or earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money spent.
    #[default]
    Expense,
    /// Money earned.
    Income,
}

impl TransactionKind {
    /// Both kinds, in the order they are offered to the user.
    pub const ALL: [TransactionKind; 2] = [TransactionKind::Expense, TransactionKind::Income];

    /// The text form used in forms, query strings and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "expense",
            TransactionKind::Income => "income",
        }
    }

    /// The label shown to the user and written to CSV exports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "Expense",
            TransactionKind::Income => "Income",
        }
    }

    /// Parse the text form produced by [TransactionKind::as_str].
    ///
    /// # Errors
    /// Returns [Error::InvalidKind] for anything other than `expense` or `income`.
    pub fn parse(text: &str) -> Result<Self, Error> {
        match text.trim() {
            "expense" => Ok(TransactionKind::Expense),
            "income" => Ok(TransactionKind::Income),
            other => Err(Error::InvalidKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What money was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    /// 食費
    Food,
    /// 日用品
    Household,
    /// 家賃
    Rent,
    /// 交通費
    Transport,
    /// 習い事
    Lessons,
    /// 雑費
    Miscellaneous,
}

impl ExpenseCategory {
    /// The vocabulary in display order. The first entry is the default.
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Food,
        ExpenseCategory::Household,
        ExpenseCategory::Rent,
        ExpenseCategory::Transport,
        ExpenseCategory::Lessons,
        ExpenseCategory::Miscellaneous,
    ];

    /// The Japanese display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "食費",
            ExpenseCategory::Household => "日用品",
            ExpenseCategory::Rent => "家賃",
            ExpenseCategory::Transport => "交通費",
            ExpenseCategory::Lessons => "習い事",
            ExpenseCategory::Miscellaneous => "雑費",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }
}

/// Where money came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeCategory {
    /// 給与
    Salary,
    /// 副収入
    SideIncome,
    /// 返金
    Refund,
    /// その他
    Other,
}

impl IncomeCategory {
    /// The vocabulary in display order. The first entry is the default.
    pub const ALL: [IncomeCategory; 4] = [
        IncomeCategory::Salary,
        IncomeCategory::SideIncome,
        IncomeCategory::Refund,
        IncomeCategory::Other,
    ];

    /// The Japanese display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "給与",
            IncomeCategory::SideIncome => "副収入",
            IncomeCategory::Refund => "返金",
            IncomeCategory::Other => "その他",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }
}

/// A category from the vocabulary of exactly one [TransactionKind].
///
/// The variant carries the kind, so a category can never be paired with the
/// other kind's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A category of spending.
    Expense(ExpenseCategory),
    /// A category of earnings.
    Income(IncomeCategory),
}

impl Category {
    /// Parse `label` as a category of `kind`.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::MissingCategory] if `label` is empty,
    /// - [Error::InvalidCategory] if `label` is not in the vocabulary of `kind`.
    pub fn parse(kind: TransactionKind, label: &str) -> Result<Self, Error> {
        let label = label.trim();

        if label.is_empty() {
            return Err(Error::MissingCategory);
        }

        let category = match kind {
            TransactionKind::Expense => ExpenseCategory::from_label(label).map(Category::Expense),
            TransactionKind::Income => IncomeCategory::from_label(label).map(Category::Income),
        };

        category.ok_or_else(|| Error::InvalidCategory(kind, label.to_owned()))
    }

    /// The first entry of the vocabulary of `kind`.
    pub fn default_for(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Expense => Category::Expense(ExpenseCategory::Food),
            TransactionKind::Income => Category::Income(IncomeCategory::Salary),
        }
    }

    /// The vocabulary of `kind` in display order.
    pub fn all(kind: TransactionKind) -> Vec<Category> {
        match kind {
            TransactionKind::Expense => ExpenseCategory::ALL.map(Category::Expense).to_vec(),
            TransactionKind::Income => IncomeCategory::ALL.map(Category::Income).to_vec(),
        }
    }

    /// The labels of the vocabulary of `kind` in display order.
    pub fn labels(kind: TransactionKind) -> Vec<&'static str> {
        Self::all(kind).iter().map(Category::as_str).collect()
    }

    /// The kind whose vocabulary this category belongs to.
    pub fn kind(&self) -> TransactionKind {
        match self {
            Category::Expense(_) => TransactionKind::Expense,
            Category::Income(_) => TransactionKind::Income,
        }
    }

    /// The display label, which is also the stored text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Expense(category) => category.as_str(),
            Category::Income(category) => category.as_str(),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
