//! Performs the external calls of an approved transaction or batch.
//!
//! The gateway owns the executor's reentrancy flag. Opening it while another
//! execution is in flight fails with [`ExecutorError::ReentrantCall`]. If an
//! execution fails, the host drops every write of the invocation, the flag
//! included, so the flag never stays stuck.

use soroban_sdk::{token, Env, Error, Val};

use crate::errors::ExecutorError;
use crate::storage;
use crate::types::{Call, DataKey, Payload};

pub(crate) struct Gateway<'a> {
    env: &'a Env,
    value_token: token::TokenClient<'a>,
}

impl<'a> Gateway<'a> {
    pub(crate) fn open(env: &'a Env) -> Result<Self, ExecutorError> {
        if env.storage().instance().has(&DataKey::Executing) {
            return Err(ExecutorError::ReentrantCall);
        }
        env.storage().instance().set(&DataKey::Executing, &true);

        let value_token = token::TokenClient::new(env, &storage::value_token(env)?);
        Ok(Self { env, value_token })
    }

    pub(crate) fn close(self) {
        self.env.storage().instance().remove(&DataKey::Executing);
    }

    /// The executor's own value-token balance.
    pub(crate) fn balance(&self) -> i128 {
        self.value_token
            .balance(&self.env.current_contract_address())
    }

    /// Runs one call. A failed transfer or a failed target invocation is
    /// reported as `false`, never as a panic.
    pub(crate) fn invoke(&self, call: &Call) -> bool {
        if call.value > 0 {
            let sent = self.value_token.try_transfer(
                &self.env.current_contract_address(),
                &call.target,
                &call.value,
            );
            if !matches!(sent, Ok(Ok(()))) {
                return false;
            }
        }

        match &call.payload {
            Payload::Transfer => true,
            Payload::Invoke(invocation) => matches!(
                self.env.try_invoke_contract::<Val, Error>(
                    &call.target,
                    &invocation.function,
                    invocation.args.clone(),
                ),
                Ok(Ok(_))
            ),
        }
    }
}
