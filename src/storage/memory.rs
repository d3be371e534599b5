use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, RwLock,
};

use tracing::debug;
use uuid::Uuid;

use super::{LedgerStore, Result, StoreData};
use crate::{
    errors::LedgerError,
    ledger::{
        Budget, BudgetDraft, BudgetPatch, Expense, ExpenseDraft, ExpensePatch, Income, IncomeDraft,
        IncomePatch, Ledger, SavingsGoal, SavingsGoalDraft, SavingsGoalPatch,
    },
};

/// Receives a fresh snapshot of the affected user after every change.
pub type LedgerCallback = Arc<dyn Fn(&Ledger) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    user_id: String,
    callback: LedgerCallback,
}

/// Records the store can hold.
trait StoredRecord: Clone {
    const ENTITY: &'static str;
    fn id(&self) -> &str;
    fn user_id(&self) -> &str;
    fn check(&self) -> Result<()>;
}

macro_rules! stored_record {
    ($ty:ty, $entity:literal) => {
        impl StoredRecord for $ty {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> &str {
                &self.id
            }

            fn user_id(&self) -> &str {
                &self.user_id
            }

            fn check(&self) -> Result<()> {
                self.validate()
            }
        }
    };
}

stored_record!(Expense, "Expense");
stored_record!(Income, "Income");
stored_record!(Budget, "Budget");
stored_record!(SavingsGoal, "Savings goal");

type Table<T> = fn(&mut StoreData) -> &mut Vec<T>;

fn expenses(data: &mut StoreData) -> &mut Vec<Expense> {
    &mut data.expenses
}

fn incomes(data: &mut StoreData) -> &mut Vec<Income> {
    &mut data.incomes
}

fn budgets(data: &mut StoreData) -> &mut Vec<Budget> {
    &mut data.budgets
}

fn savings_goals(data: &mut StoreData) -> &mut Vec<SavingsGoal> {
    &mut data.savings_goals
}

/// Thread-safe store kept entirely in memory.
///
/// Subscribers run on the mutating thread after the data lock is released,
/// so a callback may read from the store again.
#[derive(Default)]
pub struct MemoryLedgerStore {
    data: RwLock<StoreData>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_subscription: AtomicU64,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: StoreData) -> Self {
        Self {
            data: RwLock::new(data),
            ..Self::default()
        }
    }

    /// Copy of everything held, for persistence.
    pub fn export(&self) -> Result<StoreData> {
        Ok(self.read()?.clone())
    }

    pub fn user_ids(&self) -> Result<Vec<String>> {
        Ok(self.read()?.user_ids())
    }

    /// Registers `callback` for changes to `user_id`'s records. It is called
    /// once immediately with the current snapshot.
    pub fn subscribe(&self, user_id: &str, callback: LedgerCallback) -> Result<SubscriptionId> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .map_err(|_| poisoned())?
            .push(Subscriber {
                id,
                user_id: user_id.to_string(),
                callback: Arc::clone(&callback),
            });
        let snapshot = self.snapshot(user_id)?;
        callback(&snapshot);
        Ok(id)
    }

    /// Returns false when the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool> {
        let mut subscribers = self.subscribers.lock().map_err(|_| poisoned())?;
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        Ok(subscribers.len() != before)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreData>> {
        self.data.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreData>> {
        self.data.write().map_err(|_| poisoned())
    }

    fn insert<T: StoredRecord>(&self, table: Table<T>, record: T) -> Result<T> {
        record.check()?;
        let user_id = record.user_id().to_string();
        {
            let mut data = self.write()?;
            table(&mut *data).push(record.clone());
        }
        debug!(entity = T::ENTITY, id = record.id(), "record added");
        self.notify(&user_id)?;
        Ok(record)
    }

    fn modify<T: StoredRecord>(
        &self,
        table: Table<T>,
        id: &str,
        apply: impl FnOnce(&mut T),
    ) -> Result<T> {
        let updated = {
            let mut data = self.write()?;
            let slot = table(&mut *data)
                .iter_mut()
                .find(|record| record.id() == id)
                .ok_or_else(|| LedgerError::not_found(T::ENTITY, id))?;
            let mut candidate = slot.clone();
            apply(&mut candidate);
            candidate.check()?;
            *slot = candidate.clone();
            candidate
        };
        debug!(entity = T::ENTITY, id, "record updated");
        self.notify(updated.user_id())?;
        Ok(updated)
    }

    fn remove<T: StoredRecord>(&self, table: Table<T>, id: &str) -> Result<()> {
        let removed = {
            let mut data = self.write()?;
            let records = table(&mut *data);
            let index = records
                .iter()
                .position(|record| record.id() == id)
                .ok_or_else(|| LedgerError::not_found(T::ENTITY, id))?;
            records.remove(index)
        };
        debug!(entity = T::ENTITY, id, "record deleted");
        self.notify(removed.user_id())
    }

    fn notify(&self, user_id: &str) -> Result<()> {
        let callbacks: Vec<LedgerCallback> = self
            .subscribers
            .lock()
            .map_err(|_| poisoned())?
            .iter()
            .filter(|subscriber| subscriber.user_id == user_id)
            .map(|subscriber| Arc::clone(&subscriber.callback))
            .collect();
        if callbacks.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot(user_id)?;
        for callback in callbacks {
            callback(&snapshot);
        }
        Ok(())
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage("ledger store lock poisoned".into())
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl LedgerStore for MemoryLedgerStore {
    fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>> {
        Ok(self.snapshot(user_id)?.expenses)
    }

    fn list_incomes(&self, user_id: &str) -> Result<Vec<Income>> {
        Ok(self.snapshot(user_id)?.incomes)
    }

    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        Ok(self.snapshot(user_id)?.budgets)
    }

    fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        Ok(self.snapshot(user_id)?.savings_goals)
    }

    fn snapshot(&self, user_id: &str) -> Result<Ledger> {
        Ok(self.read()?.ledger_for(user_id))
    }

    fn add_expense(&self, user_id: &str, mut draft: ExpenseDraft) -> Result<Expense> {
        draft.reconcile_total();
        draft.validate()?;
        self.insert(expenses, draft.into_record(new_id(), user_id))
    }

    fn update_expense(&self, id: &str, patch: &ExpensePatch) -> Result<Expense> {
        self.modify(expenses, id, |expense| patch.apply(expense))
    }

    fn delete_expense(&self, id: &str) -> Result<()> {
        self.remove(expenses, id)
    }

    fn add_income(&self, user_id: &str, draft: IncomeDraft) -> Result<Income> {
        draft.validate()?;
        self.insert(incomes, draft.into_record(new_id(), user_id))
    }

    fn update_income(&self, id: &str, patch: &IncomePatch) -> Result<Income> {
        self.modify(incomes, id, |income| patch.apply(income))
    }

    fn delete_income(&self, id: &str) -> Result<()> {
        self.remove(incomes, id)
    }

    fn add_budget(&self, user_id: &str, draft: BudgetDraft) -> Result<Budget> {
        draft.validate()?;
        self.insert(budgets, draft.into_record(new_id(), user_id))
    }

    fn update_budget(&self, id: &str, patch: &BudgetPatch) -> Result<Budget> {
        self.modify(budgets, id, |budget| patch.apply(budget))
    }

    fn delete_budget(&self, id: &str) -> Result<()> {
        self.remove(budgets, id)
    }

    fn add_savings_goal(&self, user_id: &str, draft: SavingsGoalDraft) -> Result<SavingsGoal> {
        draft.validate()?;
        self.insert(savings_goals, draft.into_record(new_id(), user_id))
    }

    fn update_savings_goal(&self, id: &str, patch: &SavingsGoalPatch) -> Result<SavingsGoal> {
        self.modify(savings_goals, id, |goal| patch.apply(goal))
    }

    fn delete_savings_goal(&self, id: &str) -> Result<()> {
        self.remove(savings_goals, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::BudgetPeriod;

    #[test]
    fn add_assigns_unique_ids_and_scopes_by_user() {
        let store = MemoryLedgerStore::new();
        let a = store
            .add_expense("u1", ExpenseDraft::new("Shop", "2026-10-01", 5.0, "Shopping"))
            .unwrap();
        let b = store
            .add_expense("u2", ExpenseDraft::new("Shop", "2026-10-01", 7.0, "Shopping"))
            .unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list_expenses("u1").unwrap().len(), 1);
        assert_eq!(store.snapshot("u2").unwrap().expenses[0].total_amount, 7.0);
    }

    #[test]
    fn invalid_draft_is_rejected() {
        let store = MemoryLedgerStore::new();
        let err = store
            .add_budget("u1", BudgetDraft::new("", "Dining", 10.0, BudgetPeriod::Monthly))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(store.list_budgets("u1").unwrap().is_empty());
    }

    #[test]
    fn patch_that_breaks_validation_leaves_record_untouched() {
        let store = MemoryLedgerStore::new();
        let income = store
            .add_income("u1", IncomeDraft::new("Salary", "2026-10-01", 100.0))
            .unwrap();
        let patch = IncomePatch {
            amount: Some(-1.0),
            ..IncomePatch::default()
        };
        assert!(store.update_income(&income.id, &patch).is_err());
        assert_eq!(store.list_incomes("u1").unwrap()[0].amount, 100.0);
    }

    #[test]
    fn unknown_ids_report_not_found() {
        let store = MemoryLedgerStore::new();
        let err = store.delete_savings_goal("missing").unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[test]
    fn subscribers_receive_snapshots_for_their_user_only() {
        let store = MemoryLedgerStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = store
            .subscribe(
                "u1",
                Arc::new(move |ledger: &Ledger| {
                    sink.lock().unwrap().push(ledger.expenses.len());
                }),
            )
            .unwrap();

        store
            .add_expense("u1", ExpenseDraft::new("Shop", "2026-10-01", 5.0, "Shopping"))
            .unwrap();
        store
            .add_expense("u2", ExpenseDraft::new("Shop", "2026-10-01", 5.0, "Shopping"))
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![0, 1]);

        assert!(store.unsubscribe(id).unwrap());
        store
            .add_expense("u1", ExpenseDraft::new("Shop", "2026-10-02", 5.0, "Shopping"))
            .unwrap();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
