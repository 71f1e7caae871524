//! In-memory port doubles shared by the integration tests.
//!
//! Integration tests compile as separate crates, so each one pulls in only
//! the helpers it needs.
#![allow(dead_code, reason = "each test crate uses a different subset")]

pub mod embedded_postgres;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use activation_backend::domain::ports::{
    ActivationCredit, ActivationWrite, LedgerRepository, LedgerRepositoryError, PaymentGateway,
    PaymentGatewayError, UserAccountRepository, UserAccountRepositoryError,
};
use activation_backend::domain::{
    ConfirmationPolicy, GatewayTransaction, LedgerEntry, LedgerEntryKind,
    PaymentConfirmationService,
    PaymentReference, TransactionStatus, UserAccount, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        Self(
            Utc.timestamp_millis_opt(millis)
                .single()
                .expect("valid fixed instant"),
        )
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Build a gateway transaction for `reference`.
pub fn transaction(reference: &str, status: &str, amount: Decimal) -> GatewayTransaction {
    GatewayTransaction {
        reference: PaymentReference::new(reference).expect("valid reference"),
        status: TransactionStatus::parse(status),
        amount,
        currency: "NGN".to_owned(),
        paid_at: None,
        raw_payload: serde_json::json!({ "reference": reference, "status": status }),
    }
}

/// Gateway answering from a table of scripted verification results.
#[derive(Default)]
pub struct ScriptedGateway {
    results: Mutex<HashMap<String, Result<GatewayTransaction, PaymentGatewayError>>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn script(&self, reference: &str, result: Result<GatewayTransaction, PaymentGatewayError>) {
        self.results
            .lock()
            .expect("gateway mutex")
            .insert(reference.to_owned(), result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn verify_transaction(
        &self,
        reference: &PaymentReference,
    ) -> Result<GatewayTransaction, PaymentGatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .expect("gateway mutex")
            .get(reference.as_ref())
            .cloned()
            .unwrap_or_else(|| Err(PaymentGatewayError::unknown_reference(reference.as_ref())))
    }
}

/// User store with the same conditional activation semantics as the
/// PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryAccounts {
    accounts: Mutex<HashMap<Uuid, UserAccount>>,
    activate_calls: AtomicUsize,
    fail_activation: Mutex<Option<UserAccountRepositoryError>>,
}

impl InMemoryAccounts {
    pub fn insert(&self, account: UserAccount) {
        self.accounts
            .lock()
            .expect("accounts mutex")
            .insert(*account.id.as_uuid(), account);
    }

    pub fn get(&self, id: &UserId) -> Option<UserAccount> {
        self.accounts
            .lock()
            .expect("accounts mutex")
            .get(id.as_uuid())
            .cloned()
    }

    pub fn fail_activation_with(&self, error: UserAccountRepositoryError) {
        *self.fail_activation.lock().expect("failure mutex") = Some(error);
    }

    pub fn activate_calls(&self) -> usize {
        self.activate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryAccounts {
    async fn find_by_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserAccount>, UserAccountRepositoryError> {
        Ok(self.get(user_id))
    }

    async fn activate(
        &self,
        credit: &ActivationCredit,
    ) -> Result<ActivationWrite, UserAccountRepositoryError> {
        self.activate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_activation.lock().expect("failure mutex").clone() {
            return Err(error);
        }

        let mut accounts = self.accounts.lock().expect("accounts mutex");
        let Some(account) = accounts.get_mut(credit.user_id.as_uuid()) else {
            return Err(UserAccountRepositoryError::missing(
                credit.user_id.to_string(),
            ));
        };
        if account.is_paid {
            return Ok(ActivationWrite::AlreadyActivated(account.clone()));
        }
        account.is_paid = true;
        account.balance += credit.balance_delta;
        account.total_earned += credit.total_earned_delta;
        Ok(ActivationWrite::Applied(account.clone()))
    }
}

/// Appends to reject, optionally limited to one entry kind.
type LedgerFailure = (Option<LedgerEntryKind>, LedgerRepositoryError);

/// Ledger enforcing unique references.
#[derive(Default)]
pub struct InMemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
    failure: Mutex<Option<LedgerFailure>>,
}

impl InMemoryLedger {
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().expect("ledger mutex").clone()
    }

    pub fn entries_for(&self, user_id: &UserId) -> Vec<LedgerEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| &entry.user_id == user_id)
            .collect()
    }

    /// Reject every append and lookup.
    pub fn fail_with(&self, error: LedgerRepositoryError) {
        *self.failure.lock().expect("failure mutex") = Some((None, error));
    }

    /// Reject welcome bonus appends only.
    pub fn fail_bonus_with(&self, error: LedgerRepositoryError) {
        *self.failure.lock().expect("failure mutex") = Some((Some(LedgerEntryKind::Bonus), error));
    }

    pub fn recover(&self) {
        *self.failure.lock().expect("failure mutex") = None;
    }

    fn failure_for(&self, kind: Option<LedgerEntryKind>) -> Option<LedgerRepositoryError> {
        match self.failure.lock().expect("failure mutex").clone() {
            Some((None, error)) => Some(error),
            Some((Some(failing), error)) if Some(failing) == kind => Some(error),
            _ => None,
        }
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedger {
    async fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerRepositoryError> {
        if let Some(error) = self.failure_for(Some(entry.kind)) {
            return Err(error);
        }
        let mut entries = self.entries.lock().expect("ledger mutex");
        if entries.iter().any(|existing| existing.reference == entry.reference) {
            return Err(LedgerRepositoryError::duplicate_reference(
                entry.reference.clone(),
            ));
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn reference_owner(
        &self,
        reference: &PaymentReference,
    ) -> Result<Option<UserId>, LedgerRepositoryError> {
        if let Some(error) = self.failure_for(None) {
            return Err(error);
        }
        Ok(self
            .entries
            .lock()
            .expect("ledger mutex")
            .iter()
            .find(|entry| entry.reference == reference.as_ref())
            .map(|entry| entry.user_id.clone()))
    }
}

/// Doubles plus a confirmation service wired over them.
pub struct Harness {
    pub gateway: Arc<ScriptedGateway>,
    pub accounts: Arc<InMemoryAccounts>,
    pub ledger: Arc<InMemoryLedger>,
    pub service: Arc<PaymentConfirmationService<ScriptedGateway, InMemoryAccounts, InMemoryLedger>>,
}

impl Harness {
    pub const CLOCK_MILLIS: i64 = 1_700_000_000_000;

    pub fn new() -> Self {
        let gateway = Arc::new(ScriptedGateway::default());
        let accounts = Arc::new(InMemoryAccounts::default());
        let ledger = Arc::new(InMemoryLedger::default());
        let service = Arc::new(PaymentConfirmationService::new(
            Arc::clone(&gateway),
            Arc::clone(&accounts),
            Arc::clone(&ledger),
            Arc::new(FixedClock::at_millis(Self::CLOCK_MILLIS)),
            ConfirmationPolicy::default(),
        ));
        Self {
            gateway,
            accounts,
            ledger,
            service,
        }
    }

    /// Seed an unpaid account with the given balance and lifetime earnings.
    pub fn seed_account(&self, id: &str, balance: Decimal, total_earned: Decimal) -> UserId {
        let user_id = UserId::new(id).expect("valid user id");
        self.accounts.insert(UserAccount {
            id: user_id.clone(),
            email: "member@example.com".to_owned(),
            is_paid: false,
            balance,
            total_earned,
        });
        user_id
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
