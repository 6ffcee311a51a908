//! Deposit data model: amounts, accounts, checks and the editing session.
//! 存款資料模型：金額、帳戶、支票與編輯工作階段。

pub mod account;
pub mod amount;
pub mod check;
pub mod session;

pub use account::{Account, AccountError, AccountList};
pub use amount::{
    format_amount, format_amount_checked, Amount, AmountError, FormatRangeError,
    MAX_FORMATTABLE_CENTS,
};
pub use check::{Check, CheckError, CheckList};
pub use session::{
    SessionError, SessionEvent, SessionObserver, SessionView, SlipCommand, SlipSession,
};
