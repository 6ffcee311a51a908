//! Slip editing session and synchronous event dispatch.
//! 存款單編輯工作階段與同步事件分派。
//!
//! Front-ends never mutate the account or check lists directly; they send a
//! [`SlipCommand`] through [`SlipSession::dispatch`]. Each applied command
//! produces [`SessionEvent`]s that are handed to every registered
//! [`SessionObserver`] in registration order before `dispatch` returns.

use thiserror::Error;

use crate::account::{Account, AccountError, AccountList};
use crate::amount::Amount;
use crate::check::{CheckError, CheckList};

/// Errors returned when a command cannot be applied.
/// 指令無法套用時回傳的錯誤。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Check(#[from] CheckError),
}

/// User intents accepted by the session.
/// 工作階段可接受的使用者操作。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlipCommand {
    SelectAccount(String),
    ClearSelection,
    AddAccount(Account),
    RemoveAccount(String),
    AddCheck,
    AddCheckWithAmount(Amount),
    EditAmount { row: usize, input: String },
    ToggleDeleteMark(usize),
    DeleteMarked,
    ClearChecks,
    RequestRedraw,
    RequestPrint,
}

/// Notifications emitted after a command is applied.
/// 指令套用後發出的通知。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    AccountSelected(Option<String>),
    AccountsChanged,
    ChecksChanged,
    RedrawRequested,
    PrintRequested,
}

/// Receives session events; called on the dispatching thread.
/// 接收工作階段事件的觀察者，於分派執行緒上同步呼叫。
pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent, session: &SessionView<'_>);
}

/// Read-only view handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub accounts: &'a AccountList,
    pub selected: Option<&'a Account>,
    pub checks: &'a CheckList,
}

/// 帳戶、目前選取與支票清單的集合。 / Accounts, current selection and the check list.
#[derive(Default)]
pub struct SlipSession {
    accounts: AccountList,
    selected: Option<String>,
    checks: CheckList,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl std::fmt::Debug for SlipSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlipSession")
            .field("accounts", &self.accounts)
            .field("selected", &self.selected)
            .field("checks", &self.checks)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl SlipSession {
    pub fn new(accounts: AccountList) -> Self {
        Self {
            accounts,
            ..Self::default()
        }
    }

    /// 註冊觀察者並回傳其序號。 / Registers an observer and returns its slot.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) -> usize {
        self.observers.push(observer);
        self.observers.len() - 1
    }

    pub fn accounts(&self) -> &AccountList {
        &self.accounts
    }

    pub fn checks(&self) -> &CheckList {
        &self.checks
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.selected
            .as_deref()
            .and_then(|number| self.accounts.get(number))
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            accounts: &self.accounts,
            selected: self.selected_account(),
            checks: &self.checks,
        }
    }

    /// Applies `command` and notifies observers. Nothing is emitted on error.
    /// 套用指令並通知觀察者；發生錯誤時不發出事件。
    pub fn dispatch(&mut self, command: SlipCommand) -> Result<Vec<SessionEvent>, SessionError> {
        let events = self.apply(command)?;
        self.notify(&events);
        Ok(events)
    }

    fn apply(&mut self, command: SlipCommand) -> Result<Vec<SessionEvent>, SessionError> {
        let events = match command {
            SlipCommand::SelectAccount(number) => {
                if self.accounts.get(&number).is_none() {
                    return Err(AccountError::NotFound(number).into());
                }
                self.selected = Some(number.clone());
                vec![
                    SessionEvent::AccountSelected(Some(number)),
                    SessionEvent::RedrawRequested,
                ]
            }
            SlipCommand::ClearSelection => {
                self.selected = None;
                vec![
                    SessionEvent::AccountSelected(None),
                    SessionEvent::RedrawRequested,
                ]
            }
            SlipCommand::AddAccount(account) => {
                self.accounts.add(account)?;
                vec![SessionEvent::AccountsChanged]
            }
            SlipCommand::RemoveAccount(number) => {
                self.accounts.remove(&number)?;
                let mut events = vec![SessionEvent::AccountsChanged];
                if self.selected.as_deref() == Some(number.as_str()) {
                    self.selected = None;
                    events.push(SessionEvent::AccountSelected(None));
                    events.push(SessionEvent::RedrawRequested);
                }
                events
            }
            SlipCommand::AddCheck => {
                self.checks.add_check();
                checks_changed()
            }
            SlipCommand::AddCheckWithAmount(amount) => {
                self.checks.push(amount);
                checks_changed()
            }
            SlipCommand::EditAmount { row, input } => {
                self.checks.set_amount(row, &input)?;
                checks_changed()
            }
            SlipCommand::ToggleDeleteMark(row) => {
                self.checks.toggle_mark(row)?;
                vec![SessionEvent::ChecksChanged]
            }
            SlipCommand::DeleteMarked => {
                if self.checks.delete_marked() == 0 {
                    Vec::new()
                } else {
                    checks_changed()
                }
            }
            SlipCommand::ClearChecks => {
                self.checks.clear();
                checks_changed()
            }
            SlipCommand::RequestRedraw => vec![SessionEvent::RedrawRequested],
            SlipCommand::RequestPrint => vec![SessionEvent::PrintRequested],
        };
        Ok(events)
    }

    fn notify(&mut self, events: &[SessionEvent]) {
        if events.is_empty() || self.observers.is_empty() {
            return;
        }
        // Observers are detached while they run so they can borrow the session read-only.
        let mut observers = std::mem::take(&mut self.observers);
        {
            let view = self.view();
            for event in events {
                tracing::trace!(?event, "dispatching session event");
                for observer in observers.iter_mut() {
                    observer.on_event(event, &view);
                }
            }
        }
        self.observers = observers;
    }
}

fn checks_changed() -> Vec<SessionEvent> {
    vec![SessionEvent::ChecksChanged, SessionEvent::RedrawRequested]
}
