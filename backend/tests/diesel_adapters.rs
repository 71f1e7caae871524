//! Diesel adapters against embedded PostgreSQL.
//!
//! Covers the SQL the in-memory doubles only imitate: the conditional
//! activation update, `NULL` balances, and the unique ledger reference.
//! Set `SKIP_TEST_CLUSTER=1` where the embedded cluster cannot start.

mod support;

use activation_backend::domain::ports::{
    ActivationCredit, ActivationWrite, LedgerRepository, LedgerRepositoryError,
    UserAccountRepository, UserAccountRepositoryError,
};
use activation_backend::domain::{LedgerEntry, PaymentReference, PositiveAmount, UserId};
use activation_backend::outbound::persistence::{
    DbPool, DieselLedgerRepository, DieselUserAccountRepository, PoolConfig, PoolError,
};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use support::embedded_postgres::{
    count_transactions, handle_cluster_setup_failure, provision_template_database, seed_user,
    shared_cluster_handle,
};
use tokio::runtime::Runtime;

const USER: &str = "5b8f3c2a-1d4e-4a6b-9c7d-0e1f2a3b4c5d";
const OTHER_USER: &str = "e2d4c6b8-a0f1-4e3d-8c5b-7a9f1e3d5c7b";
const REFERENCE: &str = "T685312322670591";

struct TestContext {
    runtime: Runtime,
    accounts: DieselUserAccountRepository,
    ledger: DieselLedgerRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| format!("runtime: {err}"))?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database = provision_template_database(cluster)?;
    let database_url = database.url().to_owned();
    let pool = runtime
        .block_on(DbPool::new(
            PoolConfig::new(database_url.as_str())
                .with_max_size(2)
                .with_min_idle(Some(1)),
        ))
        .map_err(PoolError::into_message)?;

    Ok(TestContext {
        runtime,
        accounts: DieselUserAccountRepository::new(pool.clone()),
        ledger: DieselLedgerRepository::new(pool),
        database_url,
        _database: database,
    })
}

#[fixture]
fn db() -> Option<TestContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn welcome_credit(user_id: &UserId) -> ActivationCredit {
    let bonus = PositiveAmount::new(Decimal::new(300, 2)).expect("positive bonus");
    ActivationCredit::welcome_bonus(user_id, bonus)
}

fn payment_entry(user_id: &UserId) -> LedgerEntry {
    let amount = PositiveAmount::new(Decimal::new(1500, 2)).expect("positive amount");
    let reference = PaymentReference::new(REFERENCE).expect("valid reference");
    LedgerEntry::activation_payment(user_id, amount, &reference)
}

#[rstest]
fn concurrent_activations_credit_once(db: Option<TestContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: concurrent_activations_credit_once skipped");
        return;
    };
    let user_id = seed_user(&context.database_url, USER, Some("10.00"), Some("20.00"))
        .expect("seed user");
    let credit = welcome_credit(&user_id);

    let (first, second) = context.runtime.block_on(async {
        tokio::join!(
            context.accounts.activate(&credit),
            context.accounts.activate(&credit)
        )
    });

    let writes = [
        first.expect("first activation"),
        second.expect("second activation"),
    ];
    let applied = writes
        .iter()
        .filter(|write| matches!(write, ActivationWrite::Applied(_)))
        .count();
    assert_eq!(applied, 1);
    assert!(
        writes
            .iter()
            .any(|write| matches!(write, ActivationWrite::AlreadyActivated(_)))
    );

    let account = context
        .runtime
        .block_on(context.accounts.find_by_id(&user_id))
        .expect("lookup")
        .expect("account stored");
    assert!(account.is_paid);
    assert_eq!(account.balance, Decimal::new(1300, 2));
    assert_eq!(account.total_earned, Decimal::new(2300, 2));
}

#[rstest]
fn null_balances_are_credited_from_zero(db: Option<TestContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: null_balances_are_credited_from_zero skipped");
        return;
    };
    let user_id = seed_user(&context.database_url, USER, None, None).expect("seed user");

    let write = context
        .runtime
        .block_on(context.accounts.activate(&welcome_credit(&user_id)))
        .expect("activation");

    let ActivationWrite::Applied(account) = &write else {
        panic!("expected the credit to apply, got {write:?}");
    };
    assert!(account.is_paid);
    assert_eq!(account.balance, Decimal::new(300, 2));
    assert_eq!(account.total_earned, Decimal::new(300, 2));
}

#[rstest]
fn activating_a_missing_row_reports_missing(db: Option<TestContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: activating_a_missing_row_reports_missing skipped");
        return;
    };
    let user_id = UserId::new(USER).expect("valid user id");

    let err = context
        .runtime
        .block_on(context.accounts.activate(&welcome_credit(&user_id)))
        .expect_err("no such row");

    assert_eq!(err, UserAccountRepositoryError::missing(USER));
}

#[rstest]
fn reused_reference_hits_the_unique_constraint(db: Option<TestContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: reused_reference_hits_the_unique_constraint skipped");
        return;
    };
    let owner = seed_user(&context.database_url, USER, Some("0"), Some("0")).expect("seed owner");
    let other =
        seed_user(&context.database_url, OTHER_USER, Some("0"), Some("0")).expect("seed other");

    context
        .runtime
        .block_on(context.ledger.append(&payment_entry(&owner)))
        .expect("first claim");
    let err = context
        .runtime
        .block_on(context.ledger.append(&payment_entry(&other)))
        .expect_err("reference already stored");

    assert_eq!(err, LedgerRepositoryError::duplicate_reference(REFERENCE));
    assert_eq!(
        count_transactions(&context.database_url, &other).expect("count rows"),
        0
    );
}

#[rstest]
fn reference_owner_reads_back_the_claiming_account(db: Option<TestContext>) {
    let Some(context) = db else {
        eprintln!("SKIP-TEST-CLUSTER: reference_owner_reads_back_the_claiming_account skipped");
        return;
    };
    let owner = seed_user(&context.database_url, USER, Some("0"), Some("0")).expect("seed owner");
    let reference = PaymentReference::new(REFERENCE).expect("valid reference");

    let before = context
        .runtime
        .block_on(context.ledger.reference_owner(&reference))
        .expect("lookup before claim");
    context
        .runtime
        .block_on(context.ledger.append(&payment_entry(&owner)))
        .expect("claim");
    let after = context
        .runtime
        .block_on(context.ledger.reference_owner(&reference))
        .expect("lookup after claim");

    assert_eq!(before, None);
    assert_eq!(after, Some(owner));
}
