use crate::error::UnknownVariant;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Expense,
    Income,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        }
    }

    /// Portuguese label shown in bot replies
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKind::Expense => "Despesa",
            CategoryKind::Income => "Renda",
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(CategoryKind::Expense),
            "income" => Ok(CategoryKind::Income),
            other => Err(UnknownVariant::new("category kind", other)),
        }
    }
}

/// User-defined label used to classify transactions
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Debug, Serialize, Deserialize, TS)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}
