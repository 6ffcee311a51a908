use thiserror::Error;

/// Errors raised by account list operations.
/// 帳戶清單操作時可能發生的錯誤。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("account number must not be empty")]
    EmptyNumber,
    #[error("account {0} already exists")]
    Duplicate(String),
    #[error("account {0} was not found")]
    NotFound(String),
    #[error("line {line}: expected at least {expected} tab-separated fields, found {found}")]
    MalformedRecord {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// A bank account that can be printed on a slip.
/// 可列印於存款單上的銀行帳戶。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Account {
    pub number: String,
    pub name: String,
    pub description: String,
    pub routing_number: String,
}

impl Account {
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        routing_number: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            description: String::new(),
            routing_number: routing_number.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// 依帳號唯一識別的有序帳戶清單。 / Ordered account list keyed by account number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountList {
    accounts: Vec<Account>,
}

impl AccountList {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以既有帳戶建立清單，重複帳號視為錯誤。 / Builds a list, rejecting duplicate numbers.
    pub fn from_accounts(accounts: Vec<Account>) -> Result<Self, AccountError> {
        let mut list = Self::new();
        for account in accounts {
            list.add(account)?;
        }
        Ok(list)
    }

    /// Parses the legacy tab-separated export: one account per line as
    /// `number<TAB>name<TAB>description<TAB>routing`.
    /// 解析舊版以 Tab 分隔的帳戶匯出檔，每行一筆。
    ///
    /// Blank lines and `#` comments are skipped. Three-field lines are read as
    /// `number, name, routing` with an empty description.
    pub fn from_tsv(input: &str) -> Result<Self, AccountError> {
        let mut list = Self::new();
        for (index, raw) in input.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let account = match fields.as_slice() {
                [number, name, routing] => Account::new(*number, *name, *routing),
                [number, name, description, routing, ..] => {
                    Account::new(*number, *name, *routing).with_description(*description)
                }
                other => {
                    return Err(AccountError::MalformedRecord {
                        line: index + 1,
                        expected: 3,
                        found: other.len(),
                    })
                }
            };
            list.add(account)?;
        }
        Ok(list)
    }

    pub fn add(&mut self, account: Account) -> Result<(), AccountError> {
        if account.number.trim().is_empty() {
            return Err(AccountError::EmptyNumber);
        }
        if self.position(&account.number).is_some() {
            return Err(AccountError::Duplicate(account.number));
        }
        self.accounts.push(account);
        Ok(())
    }

    /// 以帳號取代既有帳戶資料。 / Replaces the account stored under `number`.
    ///
    /// Renaming the number is allowed as long as the new number stays unique.
    pub fn update(&mut self, number: &str, account: Account) -> Result<(), AccountError> {
        let index = self
            .position(number)
            .ok_or_else(|| AccountError::NotFound(number.to_string()))?;
        if account.number.trim().is_empty() {
            return Err(AccountError::EmptyNumber);
        }
        if account.number != number && self.position(&account.number).is_some() {
            return Err(AccountError::Duplicate(account.number));
        }
        self.accounts[index] = account;
        Ok(())
    }

    pub fn remove(&mut self, number: &str) -> Result<Account, AccountError> {
        let index = self
            .position(number)
            .ok_or_else(|| AccountError::NotFound(number.to_string()))?;
        Ok(self.accounts.remove(index))
    }

    pub fn get(&self, number: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.number == number)
    }

    pub fn get_index(&self, index: usize) -> Option<&Account> {
        self.accounts.get(index)
    }

    pub fn position(&self, number: &str) -> Option<usize> {
        self.accounts
            .iter()
            .position(|account| account.number == number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn as_slice(&self) -> &[Account] {
        &self.accounts
    }
}
