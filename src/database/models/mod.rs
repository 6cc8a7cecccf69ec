pub mod budget;
pub mod category;
pub mod investment;
pub mod transaction;

pub use budget::{Budget, BudgetFields, BudgetPeriod};
pub use category::Category;
pub use investment::{Investment, InvestmentFields, InvestmentStatus, InvestmentType, InvestmentView};
pub use transaction::{
    BorrowOrLend, PaymentMethod, SettlementStatus, Transaction, TransactionFields, TransactionType,
};
