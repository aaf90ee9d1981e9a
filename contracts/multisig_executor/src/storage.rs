use soroban_sdk::{Address, Env};

use crate::errors::ExecutorError;
use crate::types::{Batch, DataKey, Transaction};

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub(crate) const ENTRY_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const ENTRY_LIFETIME_THRESHOLD: u32 = ENTRY_BUMP_AMOUNT - DAY_IN_LEDGERS;

pub(crate) fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub(crate) fn require_initialized(env: &Env) -> Result<(), ExecutorError> {
    if !is_initialized(env) {
        return Err(ExecutorError::NotInitialized);
    }
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    Ok(())
}

pub(crate) fn value_token(env: &Env) -> Result<Address, ExecutorError> {
    env.storage()
        .instance()
        .get(&DataKey::ValueToken)
        .ok_or(ExecutorError::NotInitialized)
}

pub(crate) fn count(env: &Env, key: &DataKey) -> u64 {
    env.storage().instance().get(key).unwrap_or(0u64)
}

/// Bumps the counter behind `key` and returns the new value. Ids start at 1
/// and are never reused.
pub(crate) fn next_id(env: &Env, key: &DataKey) -> u64 {
    let id = count(env, key) + 1;
    env.storage().instance().set(key, &id);
    id
}

fn persist<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    let store = env.storage().persistent();
    store.set(key, value);
    store.extend_ttl(key, ENTRY_LIFETIME_THRESHOLD, ENTRY_BUMP_AMOUNT);
}

pub(crate) fn load_transaction(env: &Env, id: u64) -> Result<Transaction, ExecutorError> {
    env.storage()
        .persistent()
        .get(&DataKey::Transaction(id))
        .ok_or(ExecutorError::TransactionNotFound)
}

pub(crate) fn save_transaction(env: &Env, tx: &Transaction) {
    persist(env, &DataKey::Transaction(tx.id), tx);
}

pub(crate) fn load_batch(env: &Env, id: u64) -> Result<Batch, ExecutorError> {
    env.storage()
        .persistent()
        .get(&DataKey::Batch(id))
        .ok_or(ExecutorError::BatchNotFound)
}

pub(crate) fn save_batch(env: &Env, batch: &Batch) {
    persist(env, &DataKey::Batch(batch.id), batch);
}

pub(crate) fn has_approval(env: &Env, key: &DataKey) -> bool {
    env.storage().persistent().has(key)
}

pub(crate) fn record_approval(env: &Env, key: &DataKey) {
    persist(env, key, &true);
}
