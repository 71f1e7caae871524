//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod ledger_repository;
mod payment_confirmation_command;
mod payment_gateway;
mod user_account_repository;

#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{FixtureLedgerRepository, LedgerRepository, LedgerRepositoryError};
#[cfg(test)]
pub use payment_confirmation_command::MockPaymentConfirmationCommand;
pub use payment_confirmation_command::{
    FixturePaymentConfirmationCommand, PaymentConfirmationCommand,
};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{FixturePaymentGateway, PaymentGateway, PaymentGatewayError};
#[cfg(test)]
pub use user_account_repository::MockUserAccountRepository;
pub use user_account_repository::{
    ActivationCredit, ActivationWrite, FixtureUserAccountRepository, UserAccountRepository,
    UserAccountRepositoryError,
};
