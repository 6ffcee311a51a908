use thiserror::Error;

use crate::amount::{Amount, AmountError};

/// Errors raised while editing the check list.
/// 編輯支票清單時可能發生的錯誤。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("check row {row} does not exist (list has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
    #[error("check row {row}: {source}")]
    Amount {
        row: usize,
        #[source]
        source: AmountError,
    },
}

/// A single deposited check.
/// 單張存入的支票。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Check {
    pub amount: Amount,
    pub marked_for_deletion: bool,
}

impl Check {
    pub const fn new(amount: Amount) -> Self {
        Self {
            amount,
            marked_for_deletion: false,
        }
    }
}

/// Ordered list of checks. Row position decides where a check is printed.
/// 有序的支票清單；列位置決定列印在正面或背面。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckList {
    checks: Vec<Check>,
}

impl CheckList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_amounts(amounts: impl IntoIterator<Item = Amount>) -> Self {
        Self {
            checks: amounts.into_iter().map(Check::new).collect(),
        }
    }

    /// 新增一筆金額為 0.00 的支票並回傳列索引。 / Appends a 0.00 row and returns its index.
    pub fn add_check(&mut self) -> usize {
        self.checks.push(Check::default());
        self.checks.len() - 1
    }

    pub fn push(&mut self, amount: Amount) -> usize {
        self.checks.push(Check::new(amount));
        self.checks.len() - 1
    }

    /// 就地更新金額。 / Parses `input` and stores it on `row`.
    pub fn set_amount(&mut self, row: usize, input: &str) -> Result<Amount, CheckError> {
        let len = self.checks.len();
        let check = self
            .checks
            .get_mut(row)
            .ok_or(CheckError::RowOutOfRange { row, len })?;
        let amount = Amount::parse(input).map_err(|source| CheckError::Amount { row, source })?;
        check.amount = amount;
        Ok(amount)
    }

    /// Flips the deletion mark and returns the new state.
    pub fn toggle_mark(&mut self, row: usize) -> Result<bool, CheckError> {
        let len = self.checks.len();
        let check = self
            .checks
            .get_mut(row)
            .ok_or(CheckError::RowOutOfRange { row, len })?;
        check.marked_for_deletion = !check.marked_for_deletion;
        Ok(check.marked_for_deletion)
    }

    /// 刪除所有已標記的支票，其餘保持原順序。 / Drops every marked row, keeping the rest in order.
    pub fn delete_marked(&mut self) -> usize {
        let before = self.checks.len();
        self.checks.retain(|check| !check.marked_for_deletion);
        before - self.checks.len()
    }

    pub fn clear(&mut self) {
        self.checks.clear();
    }

    pub fn total(&self) -> Amount {
        self.checks.iter().map(|check| check.amount).sum()
    }

    pub fn get(&self, row: usize) -> Option<&Check> {
        self.checks.get(row)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }

    pub fn as_slice(&self) -> &[Check] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_edit_rows_in_place() {
        let mut list = CheckList::new();
        let first = list.add_check();
        let second = list.add_check();
        assert_eq!((first, second), (0, 1));
        assert!(list.get(0).unwrap().amount.is_zero());

        list.set_amount(1, "250.50").unwrap();
        list.set_amount(0, "100").unwrap();
        assert_eq!(list.total().cents(), 35_050);
    }

    #[test]
    fn invalid_edits_leave_row_untouched() {
        let mut list = CheckList::new();
        list.add_check();
        list.set_amount(0, "12.00").unwrap();

        let err = list.set_amount(0, "twelve").unwrap_err();
        assert!(matches!(err, CheckError::Amount { row: 0, .. }));
        assert_eq!(list.get(0).unwrap().amount.cents(), 1_200);

        assert_eq!(
            list.set_amount(3, "1.00"),
            Err(CheckError::RowOutOfRange { row: 3, len: 1 })
        );
    }

    #[test]
    fn delete_marked_preserves_order_of_survivors() {
        let mut list = CheckList::from_amounts(
            [100, 200, 300, 400]
                .into_iter()
                .map(|dollars| Amount::from_cents(dollars * 100)),
        );
        assert!(list.toggle_mark(1).unwrap());
        assert!(list.toggle_mark(3).unwrap());
        assert!(!list.toggle_mark(3).unwrap());
        assert!(list.toggle_mark(3).unwrap());

        assert_eq!(list.delete_marked(), 2);
        let remaining: Vec<u64> = list.iter().map(|check| check.amount.cents()).collect();
        assert_eq!(remaining, vec![10_000, 30_000]);
        assert_eq!(list.delete_marked(), 0);
    }
}
