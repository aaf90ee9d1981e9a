use soroban_sdk::{log, Address, Env};

use crate::errors::ExecutorError;
use crate::events::{TransactionCreated, TransactionExecuted, TransactionSigned};
use crate::gateway::Gateway;
use crate::quorum;
use crate::storage;
use crate::types::{Call, DataKey, Transaction};

pub(crate) fn create(env: &Env, proposer: &Address, call: Call) -> Result<u64, ExecutorError> {
    if call.value < 0 {
        return Err(ExecutorError::InvalidValue);
    }

    let id = storage::next_id(env, &DataKey::TransactionCount);
    let tx = Transaction {
        id,
        proposer: proposer.clone(),
        call,
        executed: false,
        approvals: 0,
    };
    storage::save_transaction(env, &tx);

    TransactionCreated {
        id,
        proposer: tx.proposer,
        target: tx.call.target,
        value: tx.call.value,
    }
    .publish(env);
    Ok(id)
}

pub(crate) fn approve(env: &Env, id: u64, voter: &Address) -> Result<u32, ExecutorError> {
    let mut tx = storage::load_transaction(env, id)?;
    if tx.executed {
        return Err(ExecutorError::AlreadyExecuted);
    }

    let approval = DataKey::TransactionApproval(id, voter.clone());
    if storage::has_approval(env, &approval) {
        return Err(ExecutorError::AlreadySigned);
    }

    storage::record_approval(env, &approval);
    tx.approvals += 1;
    storage::save_transaction(env, &tx);

    TransactionSigned {
        id,
        voter: voter.clone(),
        approvals: tx.approvals,
    }
    .publish(env);
    Ok(tx.approvals)
}

pub(crate) fn execute(env: &Env, id: u64, executor: &Address) -> Result<(), ExecutorError> {
    let gateway = Gateway::open(env)?;

    let mut tx = storage::load_transaction(env, id)?;
    if tx.executed {
        return Err(ExecutorError::AlreadyExecuted);
    }
    if !quorum::is_satisfied(env, tx.approvals)? {
        return Err(ExecutorError::NotEnoughApprovals);
    }

    // Flag first: anything the call triggers sees the transaction as done.
    tx.executed = true;
    storage::save_transaction(env, &tx);

    if !gateway.invoke(&tx.call) {
        log!(env, "transaction call failed", id);
        return Err(ExecutorError::ExecutionFailed);
    }
    gateway.close();

    TransactionExecuted {
        id,
        executor: executor.clone(),
    }
    .publish(env);
    Ok(())
}

pub(crate) fn has_approved(env: &Env, id: u64, principal: &Address) -> bool {
    storage::has_approval(env, &DataKey::TransactionApproval(id, principal.clone()))
}

pub(crate) fn is_ready(env: &Env, id: u64) -> Result<bool, ExecutorError> {
    let tx = storage::load_transaction(env, id)?;
    Ok(!tx.executed && quorum::is_satisfied(env, tx.approvals)?)
}
