use soroban_sdk::{contract, contractimpl, Address, Env, Error, Map, Vec};

use crate::errors::ExecutorError;
use crate::types::{Batch, Call, DataKey, Role, Transaction};
use crate::{batches, quorum, roles, storage, transactions};

#[contract]
pub struct MultiSigExecutor;

#[contractimpl]
impl MultiSigExecutor {
    pub fn initialize(
        env: Env,
        owner: Address,
        voters: Vec<Address>,
        threshold: u32,
        value_token: Address,
    ) -> Result<(), ExecutorError> {
        if storage::is_initialized(&env) {
            return Err(ExecutorError::AlreadyInitialized);
        }
        owner.require_auth();

        if voters.is_empty() {
            return Err(ExecutorError::EmptyVoterList);
        }

        if threshold == 0 {
            return Err(ExecutorError::InvalidThreshold);
        }

        if threshold > voters.len() {
            return Err(ExecutorError::ThresholdExceedsVoters);
        }

        let mut seen: Map<Address, bool> = Map::new(&env);
        for voter in voters.iter() {
            if seen.contains_key(voter.clone()) {
                return Err(ExecutorError::DuplicateVoter);
            }
            seen.set(voter, true);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Threshold, &threshold);
        env.storage().instance().set(&DataKey::ValueToken, &value_token);

        roles::grant(&env, &owner, Role::Owner)?;
        for voter in voters.iter() {
            roles::grant(&env, &voter, Role::Voter)?;
        }

        storage::require_initialized(&env)
    }

    // Role registry

    pub fn grant_role(
        env: Env,
        caller: Address,
        principal: Address,
        role: Role,
    ) -> Result<(), ExecutorError> {
        roles::authorize(&env, &caller, Role::Owner)?;
        roles::grant(&env, &principal, role)
    }

    pub fn revoke_role(
        env: Env,
        caller: Address,
        principal: Address,
        role: Role,
    ) -> Result<(), ExecutorError> {
        roles::authorize(&env, &caller, Role::Owner)?;
        roles::revoke(&env, &principal, role)
    }

    pub fn add_voter(env: Env, caller: Address, voter: Address) -> Result<(), ExecutorError> {
        Self::grant_role(env, caller, voter, Role::Voter)
    }

    pub fn remove_voter(env: Env, caller: Address, voter: Address) -> Result<(), ExecutorError> {
        Self::revoke_role(env, caller, voter, Role::Voter)
    }

    pub fn add_owner(env: Env, caller: Address, owner: Address) -> Result<(), ExecutorError> {
        Self::grant_role(env, caller, owner, Role::Owner)
    }

    pub fn remove_owner(env: Env, caller: Address, owner: Address) -> Result<(), ExecutorError> {
        Self::revoke_role(env, caller, owner, Role::Owner)
    }

    pub fn has_role(env: Env, principal: Address, role: Role) -> bool {
        roles::has_role(&env, &principal, role)
    }

    pub fn is_owner(env: Env, principal: Address) -> bool {
        roles::has_role(&env, &principal, Role::Owner)
    }

    pub fn is_voter(env: Env, principal: Address) -> bool {
        roles::has_role(&env, &principal, Role::Voter)
    }

    pub fn owner_count(env: Env) -> u32 {
        roles::role_count(&env, Role::Owner)
    }

    pub fn voter_count(env: Env) -> u32 {
        roles::role_count(&env, Role::Voter)
    }

    // Quorum

    pub fn set_threshold(env: Env, caller: Address, threshold: u32) -> Result<(), ExecutorError> {
        roles::authorize(&env, &caller, Role::Owner)?;
        quorum::set_threshold(&env, threshold)
    }

    pub fn threshold(env: Env) -> Result<u32, ExecutorError> {
        storage::require_initialized(&env)?;
        quorum::threshold(&env)
    }

    pub fn value_token(env: Env) -> Result<Address, ExecutorError> {
        storage::require_initialized(&env)?;
        storage::value_token(&env)
    }

    // Single transactions

    pub fn create_transaction(env: Env, proposer: Address, call: Call) -> Result<u64, ExecutorError> {
        roles::authorize(&env, &proposer, Role::Owner)?;
        transactions::create(&env, &proposer, call)
    }

    pub fn approve_transaction(env: Env, tx_id: u64, voter: Address) -> Result<u32, ExecutorError> {
        roles::authorize(&env, &voter, Role::Voter)?;
        transactions::approve(&env, tx_id, &voter)
    }

    pub fn execute_transaction(env: Env, tx_id: u64, voter: Address) -> Result<(), ExecutorError> {
        roles::authorize(&env, &voter, Role::Voter)?;
        transactions::execute(&env, tx_id, &voter)
    }

    pub fn get_transaction(env: Env, tx_id: u64) -> Result<Transaction, ExecutorError> {
        storage::require_initialized(&env)?;
        storage::load_transaction(&env, tx_id)
    }

    pub fn is_transaction_executed(env: Env, tx_id: u64) -> Result<bool, ExecutorError> {
        Ok(Self::get_transaction(env, tx_id)?.executed)
    }

    pub fn is_transaction_ready(env: Env, tx_id: u64) -> Result<bool, ExecutorError> {
        storage::require_initialized(&env)?;
        transactions::is_ready(&env, tx_id)
    }

    pub fn has_approved_transaction(env: Env, tx_id: u64, principal: Address) -> bool {
        transactions::has_approved(&env, tx_id, &principal)
    }

    pub fn transaction_count(env: Env) -> u64 {
        storage::count(&env, &DataKey::TransactionCount)
    }

    // Batches

    pub fn create_batch(env: Env, proposer: Address, calls: Vec<Call>) -> Result<u64, ExecutorError> {
        roles::authorize(&env, &proposer, Role::Owner)?;
        batches::create(&env, &proposer, calls)
    }

    pub fn approve_batch(env: Env, batch_id: u64, voter: Address) -> Result<u32, ExecutorError> {
        roles::authorize(&env, &voter, Role::Voter)?;
        batches::approve(&env, batch_id, &voter)
    }

    /// Member failures are reported as [`crate::batch_member_failed`] with
    /// the failing index; every other failure is an [`ExecutorError`].
    pub fn execute_batch(env: Env, batch_id: u64, voter: Address) -> Result<(), Error> {
        roles::authorize(&env, &voter, Role::Voter)?;
        batches::execute(&env, batch_id, &voter)
    }

    pub fn get_batch(env: Env, batch_id: u64) -> Result<Batch, ExecutorError> {
        storage::require_initialized(&env)?;
        storage::load_batch(&env, batch_id)
    }

    pub fn is_batch_executed(env: Env, batch_id: u64) -> Result<bool, ExecutorError> {
        Ok(Self::get_batch(env, batch_id)?.executed)
    }

    pub fn is_batch_ready(env: Env, batch_id: u64) -> Result<bool, ExecutorError> {
        storage::require_initialized(&env)?;
        batches::is_ready(&env, batch_id)
    }

    pub fn has_approved_batch(env: Env, batch_id: u64, principal: Address) -> bool {
        batches::has_approved(&env, batch_id, &principal)
    }

    pub fn batch_count(env: Env) -> u64 {
        storage::count(&env, &DataKey::BatchCount)
    }
}
