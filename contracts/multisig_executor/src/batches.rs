use soroban_sdk::{Address, Env, Error, Vec};

use crate::errors::{batch_member_failed, ExecutorError};
use crate::events::{BatchCreated, BatchExecuted, BatchSigned};
use crate::gateway::Gateway;
use crate::quorum;
use crate::storage;
use crate::types::{Batch, Call, DataKey, Operation};

pub(crate) fn create(env: &Env, proposer: &Address, calls: Vec<Call>) -> Result<u64, ExecutorError> {
    if calls.is_empty() {
        return Err(ExecutorError::EmptyBatch);
    }

    let mut operations = Vec::new(env);
    let mut total_value: i128 = 0;
    for call in calls.iter() {
        if call.value < 0 {
            return Err(ExecutorError::InvalidValue);
        }
        total_value = total_value
            .checked_add(call.value)
            .ok_or(ExecutorError::InvalidValue)?;
        operations.push_back(Operation {
            call,
            executed: false,
        });
    }

    let id = storage::next_id(env, &DataKey::BatchCount);
    let batch = Batch {
        id,
        proposer: proposer.clone(),
        operations,
        executed: false,
        approvals: 0,
        total_value,
    };
    storage::save_batch(env, &batch);

    BatchCreated {
        id,
        proposer: batch.proposer,
        size: batch.operations.len(),
        total_value,
    }
    .publish(env);
    Ok(id)
}

pub(crate) fn approve(env: &Env, id: u64, voter: &Address) -> Result<u32, ExecutorError> {
    let mut batch = storage::load_batch(env, id)?;
    if batch.executed {
        return Err(ExecutorError::AlreadyExecuted);
    }

    let approval = DataKey::BatchApproval(id, voter.clone());
    if storage::has_approval(env, &approval) {
        return Err(ExecutorError::AlreadySigned);
    }

    storage::record_approval(env, &approval);
    batch.approvals += 1;
    storage::save_batch(env, &batch);

    BatchSigned {
        id,
        voter: voter.clone(),
        approvals: batch.approvals,
    }
    .publish(env);
    Ok(batch.approvals)
}

/// Runs every member in order or none of them. The first failing member
/// ends the run with [`batch_member_failed`] carrying its index, and the host
/// then drops every write made during this run.
pub(crate) fn execute(env: &Env, id: u64, executor: &Address) -> Result<(), Error> {
    let gateway = Gateway::open(env)?;

    let mut batch = storage::load_batch(env, id)?;
    if batch.executed {
        return Err(ExecutorError::AlreadyExecuted.into());
    }
    if !quorum::is_satisfied(env, batch.approvals)? {
        return Err(ExecutorError::NotEnoughApprovals.into());
    }
    if gateway.balance() < batch.total_value {
        return Err(ExecutorError::InsufficientFunds.into());
    }

    // Persisted before any call so a nested attempt sees the batch as done.
    batch.executed = true;
    storage::save_batch(env, &batch);

    for index in 0..batch.operations.len() {
        let mut operation = batch.operations.get_unchecked(index);
        if !gateway.invoke(&operation.call) {
            return Err(batch_member_failed(index));
        }
        operation.executed = true;
        batch.operations.set(index, operation);
    }
    storage::save_batch(env, &batch);
    gateway.close();

    BatchExecuted {
        id,
        executor: executor.clone(),
    }
    .publish(env);
    Ok(())
}

pub(crate) fn has_approved(env: &Env, id: u64, principal: &Address) -> bool {
    storage::has_approval(env, &DataKey::BatchApproval(id, principal.clone()))
}

pub(crate) fn is_ready(env: &Env, id: u64) -> Result<bool, ExecutorError> {
    let batch = storage::load_batch(env, id)?;
    Ok(!batch.executed && quorum::is_satisfied(env, batch.approvals)?)
}
