use serde::{Deserialize, Serialize};

/// Categories shared by transactions and budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Bills,
    Shopping,
    Investment,
    Entertainment,
    Healthcare,
    Education,
    Transport,
    Utilities,
    Salary,
    Business,
    Freelance,
    Other,
}

impl Category {
    pub const ALL: [Category; 14] = [
        Self::Food,
        Self::Travel,
        Self::Bills,
        Self::Shopping,
        Self::Investment,
        Self::Entertainment,
        Self::Healthcare,
        Self::Education,
        Self::Transport,
        Self::Utilities,
        Self::Salary,
        Self::Business,
        Self::Freelance,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Travel => "Travel",
            Self::Bills => "Bills",
            Self::Shopping => "Shopping",
            Self::Investment => "Investment",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Salary => "Salary",
            Self::Business => "Business",
            Self::Freelance => "Freelance",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Income-only categories never carry a spending budget.
    pub fn is_budgetable(&self) -> bool {
        !matches!(self, Self::Salary | Self::Business | Self::Freelance)
    }
}
