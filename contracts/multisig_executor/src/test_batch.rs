#![cfg(test)]

use super::*;
use crate::test_helpers::Setup;
use soroban_sdk::{testutils::Address as _, vec, Address, Error, IntoVal, Vec};

fn code(error: ExecutorError) -> Error {
    error.into()
}

fn three_transfers(s: &Setup) -> (Vec<Call>, Vec<Address>) {
    let recipients = vec![
        &s.env,
        Address::generate(&s.env),
        Address::generate(&s.env),
        Address::generate(&s.env),
    ];
    let calls = vec![
        &s.env,
        s.transfer(&recipients.get_unchecked(0), 1),
        s.transfer(&recipients.get_unchecked(1), 2),
        s.transfer(&recipients.get_unchecked(2), 3),
    ];
    (calls, recipients)
}

#[test]
fn test_create_batch() {
    let s = Setup::new(3, 2);
    let (calls, _) = three_transfers(&s);

    let batch_id = s.client.create_batch(&s.owner, &calls);
    assert_eq!(batch_id, 1);
    assert_eq!(s.client.batch_count(), 1);

    let batch = s.client.get_batch(&batch_id);
    assert_eq!(batch.proposer, s.owner);
    assert_eq!(batch.total_value, 6);
    assert_eq!(batch.operations.len(), 3);
    assert_eq!(batch.approvals, 0);
    assert!(!batch.executed);
    for operation in batch.operations.iter() {
        assert!(!operation.executed);
    }
    assert_eq!(batch.operations.get_unchecked(1).call, calls.get_unchecked(1));

    // Batches and transactions count separately.
    assert_eq!(s.client.transaction_count(), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #18)")]
fn test_create_empty_batch() {
    let s = Setup::new(3, 2);
    s.client.create_batch(&s.owner, &Vec::new(&s.env));
}

#[test]
fn test_create_batch_rejects_bad_values() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);

    let negative = vec![&s.env, s.transfer(&recipient, 1), s.transfer(&recipient, -1)];
    assert_eq!(
        s.client.try_create_batch(&s.owner, &negative),
        Err(Ok(ExecutorError::InvalidValue))
    );

    let overflowing = vec![
        &s.env,
        s.transfer(&recipient, i128::MAX),
        s.transfer(&recipient, 1),
    ];
    assert_eq!(
        s.client.try_create_batch(&s.owner, &overflowing),
        Err(Ok(ExecutorError::InvalidValue))
    );
    assert_eq!(s.client.batch_count(), 0);
}

#[test]
fn test_batch_role_gating() {
    let s = Setup::new(3, 2);
    let (calls, _) = three_transfers(&s);
    let outsider = Address::generate(&s.env);

    assert_eq!(
        s.client.try_create_batch(&s.voter(0), &calls),
        Err(Ok(ExecutorError::Unauthorized))
    );
    assert_eq!(s.client.batch_count(), 0);

    let batch_id = s.client.create_batch(&s.owner, &calls);
    assert_eq!(
        s.client.try_approve_batch(&batch_id, &outsider),
        Err(Ok(ExecutorError::Unauthorized))
    );
    assert_eq!(
        s.client.try_execute_batch(&batch_id, &s.owner),
        Err(Ok(code(ExecutorError::Unauthorized)))
    );
    assert_eq!(s.client.get_batch(&batch_id).approvals, 0);
}

#[test]
fn test_approve_batch_twice() {
    let s = Setup::new(3, 2);
    let (calls, _) = three_transfers(&s);
    let batch_id = s.client.create_batch(&s.owner, &calls);

    assert_eq!(s.client.approve_batch(&batch_id, &s.voter(0)), 1);
    assert!(s.client.has_approved_batch(&batch_id, &s.voter(0)));
    assert_eq!(
        s.client.try_approve_batch(&batch_id, &s.voter(0)),
        Err(Ok(ExecutorError::AlreadySigned))
    );
    assert_eq!(s.client.get_batch(&batch_id).approvals, 1);
}

#[test]
fn test_batch_and_transaction_approvals_are_separate() {
    let s = Setup::new(3, 2);
    let (calls, recipients) = three_transfers(&s);
    let batch_id = s.client.create_batch(&s.owner, &calls);
    let tx_id = s
        .client
        .create_transaction(&s.owner, &s.transfer(&recipients.get_unchecked(0), 0));
    assert_eq!(batch_id, tx_id);

    s.client.approve_batch(&batch_id, &s.voter(0));
    assert!(!s.client.has_approved_transaction(&tx_id, &s.voter(0)));
    assert_eq!(s.client.approve_transaction(&tx_id, &s.voter(0)), 1);
}

#[test]
#[should_panic(expected = "Error(Contract, #14)")]
fn test_approve_nonexistent_batch() {
    let s = Setup::new(3, 2);
    s.client.approve_batch(&7u64, &s.voter(0));
}

#[test]
fn test_execute_batch_success() {
    let s = Setup::new(3, 2);
    let (calls, recipients) = three_transfers(&s);
    s.fund(6);

    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 2);
    assert!(s.client.is_batch_ready(&batch_id));
    s.client.execute_batch(&batch_id, &s.voter(2));

    let batch = s.client.get_batch(&batch_id);
    assert!(batch.executed);
    for operation in batch.operations.iter() {
        assert!(operation.executed);
    }
    assert_eq!(s.token.balance(&recipients.get_unchecked(0)), 1);
    assert_eq!(s.token.balance(&recipients.get_unchecked(1)), 2);
    assert_eq!(s.token.balance(&recipients.get_unchecked(2)), 3);
    assert_eq!(s.token.balance(&s.client.address), 0);
    assert!(!s.client.is_batch_ready(&batch_id));
}

#[test]
fn test_execute_batch_insufficient_funds() {
    let s = Setup::new(3, 2);
    let (calls, recipients) = three_transfers(&s);
    s.fund(5);

    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 2);
    assert_eq!(
        s.client.try_execute_batch(&batch_id, &s.voter(0)),
        Err(Ok(code(ExecutorError::InsufficientFunds)))
    );

    assert!(!s.client.is_batch_executed(&batch_id));
    assert_eq!(s.token.balance(&recipients.get_unchecked(0)), 0);
    assert_eq!(s.token.balance(&s.client.address), 5);
}

#[test]
fn test_execute_batch_not_enough_approvals() {
    let s = Setup::new(3, 2);
    let (calls, _) = three_transfers(&s);
    s.fund(6);

    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 1);
    assert_eq!(
        s.client.try_execute_batch(&batch_id, &s.voter(0)),
        Err(Ok(code(ExecutorError::NotEnoughApprovals)))
    );
    assert!(!s.client.is_batch_executed(&batch_id));
}

#[test]
fn test_execute_batch_twice() {
    let s = Setup::new(3, 2);
    let (calls, _) = three_transfers(&s);
    s.fund(12);

    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 2);
    s.client.execute_batch(&batch_id, &s.voter(0));

    assert_eq!(
        s.client.try_execute_batch(&batch_id, &s.voter(1)),
        Err(Ok(code(ExecutorError::AlreadyExecuted)))
    );
    assert_eq!(
        s.client.try_approve_batch(&batch_id, &s.voter(2)),
        Err(Ok(ExecutorError::AlreadyExecuted))
    );
    assert_eq!(s.token.balance(&s.client.address), 6);
}

#[test]
fn test_failing_member_rolls_back_whole_batch() {
    let s = Setup::new(3, 2);
    let target = s.register_target();
    let recipient = Address::generate(&s.env);
    s.fund(2);

    let calls = vec![
        &s.env,
        s.call(&target.address, "ping", s.no_args()),
        s.transfer(&recipient, 2),
        s.call(&target.address, "ping", s.no_args()),
        s.call(&target.address, "refuse", s.no_args()),
    ];
    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 2);

    // The refusing member sits at index 3.
    assert_eq!(
        s.client.try_execute_batch(&batch_id, &s.voter(0)),
        Err(Ok(batch_member_failed(3)))
    );

    let batch = s.client.get_batch(&batch_id);
    assert!(!batch.executed);
    assert_eq!(batch.approvals, 2);
    for operation in batch.operations.iter() {
        assert!(!operation.executed);
    }
    assert_eq!(target.hits(), 0);
    assert_eq!(s.token.balance(&recipient), 0);
    assert_eq!(s.token.balance(&s.client.address), 2);
}

#[test]
fn test_batch_retry_after_failure() {
    let s = Setup::new(2, 1);
    let target = s.register_target();
    let recipient = Address::generate(&s.env);

    // Unfunded executor: refused up front, before the ping runs.
    let calls = vec![
        &s.env,
        s.call(&target.address, "ping", s.no_args()),
        s.transfer(&recipient, 3),
    ];
    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 1);

    assert_eq!(
        s.client.try_execute_batch(&batch_id, &s.voter(0)),
        Err(Ok(code(ExecutorError::InsufficientFunds)))
    );

    s.fund(3);
    s.client.execute_batch(&batch_id, &s.voter(1));
    assert!(s.client.is_batch_executed(&batch_id));
    assert_eq!(target.hits(), 1);
    assert_eq!(s.token.balance(&recipient), 3);
}

#[test]
fn test_batch_members_run_in_order() {
    let s = Setup::new(2, 1);
    let target = s.register_target();

    let calls = vec![
        &s.env,
        s.call(&target.address, "record", vec![&s.env, 0u32.into_val(&s.env)]),
        s.call(&target.address, "record", vec![&s.env, 1u32.into_val(&s.env)]),
        s.call(&target.address, "record", vec![&s.env, 2u32.into_val(&s.env)]),
    ];
    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 1);
    s.client.execute_batch(&batch_id, &s.voter(0));

    assert_eq!(target.records(), vec![&s.env, 0u32, 1, 2]);
    assert_eq!(s.client.get_batch(&batch_id).total_value, 0);
}

#[test]
fn test_failed_member_index_is_reported() {
    let s = Setup::new(2, 1);
    let target = s.register_target();

    let calls = vec![
        &s.env,
        s.call(&target.address, "ping", s.no_args()),
        s.call(&target.address, "refuse", s.no_args()),
        s.call(&target.address, "ping", s.no_args()),
    ];
    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 1);

    let failed = batch_member_failed(1);
    assert_eq!(
        s.client.try_execute_batch(&batch_id, &s.voter(0)),
        Err(Ok(failed))
    );
    assert_eq!(
        failed,
        Error::from_contract_error(BATCH_MEMBER_FAILED_BASE + 1)
    );
    assert_eq!(target.hits(), 0);
    assert!(!s.client.is_batch_executed(&batch_id));
}

#[test]
fn test_member_flags_persisted_after_run() {
    let s = Setup::new(2, 1);
    let target = s.register_target();
    let recipient = Address::generate(&s.env);
    s.fund(1);

    let calls = vec![
        &s.env,
        s.transfer(&recipient, 1),
        s.call(&target.address, "ping", s.no_args()),
    ];
    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 1);
    s.client.execute_batch(&batch_id, &s.voter(0));

    let batch = s.client.get_batch(&batch_id);
    assert!(batch.executed);
    assert!(batch.operations.iter().all(|operation| operation.executed));
    assert_eq!(batch.operations.get_unchecked(0).call, calls.get_unchecked(0));
}
