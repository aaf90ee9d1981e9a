#![cfg(test)]

use super::*;
use crate::gateway::Gateway;
use crate::test_helpers::{create_test_voters, reenter_args, Reentrant, Setup};
use soroban_sdk::{testutils::Address as _, vec, Address, Env, IntoVal, String, Vec};
use token_registry::{TokenRegistry, TokenRegistryClient};

#[test]
fn test_initialize_success() {
    let s = Setup::new(3, 2);

    assert_eq!(s.client.threshold(), 2);
    assert_eq!(s.client.voter_count(), 3);
    assert_eq!(s.client.owner_count(), 1);
    assert!(s.client.is_owner(&s.owner));
    assert!(s.client.is_voter(&s.voter(2)));
    assert!(!s.client.is_voter(&s.owner));
    assert_eq!(s.client.value_token(), s.token.address);
    assert_eq!(s.client.transaction_count(), 0);
    assert_eq!(s.client.batch_count(), 0);
}

#[test]
#[should_panic(expected = "Error(Contract, #6)")]
fn test_initialize_zero_threshold() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(MultiSigExecutor, ());
    let client = MultiSigExecutorClient::new(&env, &contract_id);

    let voters = create_test_voters(&env, 3);
    client.initialize(&Address::generate(&env), &voters, &0, &Address::generate(&env));
}

#[test]
#[should_panic(expected = "Error(Contract, #7)")]
fn test_initialize_threshold_exceeds_voters() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(MultiSigExecutor, ());
    let client = MultiSigExecutorClient::new(&env, &contract_id);

    let voters = create_test_voters(&env, 3);
    client.initialize(&Address::generate(&env), &voters, &4, &Address::generate(&env));
}

#[test]
fn test_initialize_rejects_bad_voter_lists() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(MultiSigExecutor, ());
    let client = MultiSigExecutorClient::new(&env, &contract_id);
    let owner = Address::generate(&env);
    let token = Address::generate(&env);

    let empty: Vec<Address> = Vec::new(&env);
    assert_eq!(
        client.try_initialize(&owner, &empty, &1, &token),
        Err(Ok(ExecutorError::EmptyVoterList))
    );

    let voter = Address::generate(&env);
    let duplicated = vec![&env, voter.clone(), Address::generate(&env), voter];
    assert_eq!(
        client.try_initialize(&owner, &duplicated, &1, &token),
        Err(Ok(ExecutorError::DuplicateVoter))
    );
}

#[test]
fn test_initialize_requires_owner_auth() {
    let env = Env::default();
    let contract_id = env.register(MultiSigExecutor, ());
    let client = MultiSigExecutorClient::new(&env, &contract_id);

    let voters = create_test_voters(&env, 3);
    let result = client.try_initialize(
        &Address::generate(&env),
        &voters,
        &2,
        &Address::generate(&env),
    );
    assert!(result.is_err());

    env.mock_all_auths();
    assert_eq!(client.try_threshold(), Err(Ok(ExecutorError::NotInitialized)));
}

#[test]
fn test_initialize_twice() {
    let s = Setup::new(3, 2);
    assert_eq!(
        s.client
            .try_initialize(&s.owner, &s.voters, &2, &s.token.address),
        Err(Ok(ExecutorError::AlreadyInitialized))
    );
}

#[test]
fn test_calls_before_initialize() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(MultiSigExecutor, ());
    let client = MultiSigExecutorClient::new(&env, &contract_id);

    let anyone = Address::generate(&env);
    assert_eq!(client.try_threshold(), Err(Ok(ExecutorError::NotInitialized)));
    assert_eq!(
        client.try_approve_transaction(&1, &anyone),
        Err(Ok(ExecutorError::NotInitialized))
    );
}

#[test]
fn test_add_and_remove_voter() {
    let s = Setup::new(2, 2);
    let newcomer = Address::generate(&s.env);

    s.client.add_voter(&s.owner, &newcomer);
    assert!(s.client.is_voter(&newcomer));
    assert!(s.client.has_role(&newcomer, &Role::Voter));
    assert_eq!(s.client.voter_count(), 3);

    assert_eq!(
        s.client.try_add_voter(&s.owner, &newcomer),
        Err(Ok(ExecutorError::AlreadyVoter))
    );

    s.client.remove_voter(&s.owner, &newcomer);
    assert!(!s.client.is_voter(&newcomer));
    assert_eq!(s.client.voter_count(), 2);

    assert_eq!(
        s.client.try_remove_voter(&s.owner, &newcomer),
        Err(Ok(ExecutorError::NotVoter))
    );
}

#[test]
fn test_voter_management_requires_owner() {
    let s = Setup::new(3, 2);
    let newcomer = Address::generate(&s.env);

    assert_eq!(
        s.client.try_add_voter(&s.voter(0), &newcomer),
        Err(Ok(ExecutorError::Unauthorized))
    );
    assert_eq!(
        s.client.try_remove_voter(&s.voter(0), &s.voter(1)),
        Err(Ok(ExecutorError::Unauthorized))
    );
    assert_eq!(
        s.client.try_set_threshold(&s.voter(0), &1),
        Err(Ok(ExecutorError::Unauthorized))
    );

    assert!(!s.client.is_voter(&newcomer));
    assert!(s.client.is_voter(&s.voter(1)));
    assert_eq!(s.client.threshold(), 2);
}

#[test]
fn test_owner_management() {
    let s = Setup::new(3, 2);
    let second = Address::generate(&s.env);

    s.client.add_owner(&s.owner, &second);
    assert_eq!(s.client.owner_count(), 2);
    assert_eq!(
        s.client.try_grant_role(&s.owner, &second, &Role::Owner),
        Err(Ok(ExecutorError::AlreadyOwner))
    );

    s.client.remove_owner(&second, &s.owner);
    assert!(!s.client.is_owner(&s.owner));
    assert_eq!(
        s.client.try_revoke_role(&second, &s.owner, &Role::Owner),
        Err(Ok(ExecutorError::NotOwner))
    );

    // The last owner cannot be removed, not even by itself.
    assert_eq!(
        s.client.try_remove_owner(&second, &second),
        Err(Ok(ExecutorError::LastOwner))
    );
    assert_eq!(s.client.owner_count(), 1);
}

#[test]
fn test_set_threshold() {
    let s = Setup::new(3, 2);

    s.client.set_threshold(&s.owner, &3);
    assert_eq!(s.client.threshold(), 3);

    assert_eq!(
        s.client.try_set_threshold(&s.owner, &0),
        Err(Ok(ExecutorError::InvalidThreshold))
    );
    assert_eq!(s.client.threshold(), 3);
}

#[test]
fn test_threshold_above_voter_count_blocks_execution() {
    // Neither set_threshold nor remove_voter compares the threshold with the
    // voter count, so this state is reachable and stalls every execution
    // until an owner lowers the threshold.
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 0));

    s.client.set_threshold(&s.owner, &5);
    s.client.remove_voter(&s.owner, &s.voter(2));
    assert_eq!(s.client.threshold(), 5);
    assert_eq!(s.client.voter_count(), 2);

    s.approve_transaction_by(tx_id, 2);
    assert_eq!(
        s.client.try_execute_transaction(&tx_id, &s.voter(0)),
        Err(Ok(ExecutorError::NotEnoughApprovals))
    );

    s.client.set_threshold(&s.owner, &2);
    s.client.execute_transaction(&tx_id, &s.voter(0));
    assert!(s.client.is_transaction_executed(&tx_id));
}

#[test]
fn test_removed_voter_approval_still_counts() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 0));

    s.client.approve_transaction(&tx_id, &s.voter(2));
    s.client.remove_voter(&s.owner, &s.voter(2));
    s.client.approve_transaction(&tx_id, &s.voter(0));

    s.client.execute_transaction(&tx_id, &s.voter(1));
    assert!(s.client.is_transaction_executed(&tx_id));
}

#[test]
fn test_create_transaction() {
    let s = Setup::new(3, 2);
    let target = s.register_target();

    let call = s.call(&target.address, "ping", s.no_args());
    let tx_id = s.client.create_transaction(&s.owner, &call);

    assert_eq!(tx_id, 1);
    assert_eq!(s.client.transaction_count(), 1);

    let tx = s.client.get_transaction(&tx_id);
    assert_eq!(tx.id, tx_id);
    assert_eq!(tx.proposer, s.owner);
    assert_eq!(tx.call, call);
    assert_eq!(tx.approvals, 0);
    assert!(!tx.executed);

    let second = s.client.create_transaction(&s.owner, &call);
    assert_eq!(second, 2);
}

#[test]
#[should_panic(expected = "Error(Contract, #3)")]
fn test_create_transaction_by_voter() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    s.client
        .create_transaction(&s.voter(0), &s.transfer(&recipient, 1));
}

#[test]
#[should_panic(expected = "Error(Contract, #23)")]
fn test_create_transaction_negative_value() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    s.client
        .create_transaction(&s.owner, &s.transfer(&recipient, -1));
}

#[test]
fn test_approve_transaction() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 0));

    assert_eq!(s.client.approve_transaction(&tx_id, &s.voter(0)), 1);
    assert!(s.client.has_approved_transaction(&tx_id, &s.voter(0)));
    assert!(!s.client.has_approved_transaction(&tx_id, &s.voter(1)));

    assert_eq!(s.client.approve_transaction(&tx_id, &s.voter(1)), 2);
    assert_eq!(s.client.get_transaction(&tx_id).approvals, 2);
}

#[test]
fn test_approve_transaction_twice() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 0));

    s.client.approve_transaction(&tx_id, &s.voter(0));
    assert_eq!(
        s.client.try_approve_transaction(&tx_id, &s.voter(0)),
        Err(Ok(ExecutorError::AlreadySigned))
    );
    assert_eq!(s.client.get_transaction(&tx_id).approvals, 1);
}

#[test]
fn test_approve_transaction_role_gating() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 0));
    let outsider = Address::generate(&s.env);

    assert_eq!(
        s.client.try_approve_transaction(&tx_id, &outsider),
        Err(Ok(ExecutorError::Unauthorized))
    );
    assert_eq!(
        s.client.try_approve_transaction(&tx_id, &s.owner),
        Err(Ok(ExecutorError::Unauthorized))
    );
    assert_eq!(
        s.client.try_execute_transaction(&tx_id, &outsider),
        Err(Ok(ExecutorError::Unauthorized))
    );
    assert_eq!(s.client.get_transaction(&tx_id).approvals, 0);
    assert!(!s.client.has_approved_transaction(&tx_id, &outsider));
}

#[test]
#[should_panic(expected = "Error(Contract, #13)")]
fn test_approve_nonexistent_transaction() {
    let s = Setup::new(3, 2);
    s.client.approve_transaction(&999u64, &s.voter(0));
}

#[test]
fn test_execute_transaction_quorum_gate() {
    let s = Setup::new(3, 2);
    let target = s.register_target();
    let tx_id = s
        .client
        .create_transaction(&s.owner, &s.call(&target.address, "ping", s.no_args()));

    s.client.approve_transaction(&tx_id, &s.voter(0));
    assert!(!s.client.is_transaction_ready(&tx_id));
    assert_eq!(
        s.client.try_execute_transaction(&tx_id, &s.voter(0)),
        Err(Ok(ExecutorError::NotEnoughApprovals))
    );
    assert_eq!(target.hits(), 0);

    s.client.approve_transaction(&tx_id, &s.voter(1));
    assert!(s.client.is_transaction_ready(&tx_id));
    s.client.execute_transaction(&tx_id, &s.voter(2));

    assert!(s.client.is_transaction_executed(&tx_id));
    assert!(!s.client.is_transaction_ready(&tx_id));
    assert_eq!(target.hits(), 1);
}

#[test]
fn test_execute_transaction_twice() {
    let s = Setup::new(3, 2);
    let target = s.register_target();
    let tx_id = s
        .client
        .create_transaction(&s.owner, &s.call(&target.address, "ping", s.no_args()));
    s.approve_transaction_by(tx_id, 2);
    s.client.execute_transaction(&tx_id, &s.voter(0));

    for i in 0..3 {
        assert_eq!(
            s.client.try_execute_transaction(&tx_id, &s.voter(i)),
            Err(Ok(ExecutorError::AlreadyExecuted))
        );
    }
    assert_eq!(
        s.client.try_approve_transaction(&tx_id, &s.voter(2)),
        Err(Ok(ExecutorError::AlreadyExecuted))
    );
    assert_eq!(target.hits(), 1);
}

#[test]
fn test_execute_transaction_transfers_value() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    s.fund(10);

    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 4));
    s.approve_transaction_by(tx_id, 2);
    assert_eq!(s.client.get_transaction(&tx_id).call.payload, Payload::Transfer);
    s.client.execute_transaction(&tx_id, &s.voter(0));

    assert_eq!(s.token.balance(&recipient), 4);
    assert_eq!(s.token.balance(&s.client.address), 6);
}

#[test]
fn test_failed_call_leaves_transaction_pending() {
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);

    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 5));
    s.approve_transaction_by(tx_id, 2);

    // Nothing to send yet.
    assert_eq!(
        s.client.try_execute_transaction(&tx_id, &s.voter(0)),
        Err(Ok(ExecutorError::ExecutionFailed))
    );
    let tx = s.client.get_transaction(&tx_id);
    assert!(!tx.executed);
    assert_eq!(tx.approvals, 2);

    // A fresh execute is the retry path.
    s.fund(5);
    s.client.execute_transaction(&tx_id, &s.voter(1));
    assert!(s.client.is_transaction_executed(&tx_id));
    assert_eq!(s.token.balance(&recipient), 5);
}

#[test]
fn test_refusing_target_fails_execution() {
    let s = Setup::new(2, 1);
    let target = s.register_target();
    let tx_id = s
        .client
        .create_transaction(&s.owner, &s.call(&target.address, "refuse", s.no_args()));
    s.approve_transaction_by(tx_id, 1);

    assert_eq!(
        s.client.try_execute_transaction(&tx_id, &s.voter(0)),
        Err(Ok(ExecutorError::ExecutionFailed))
    );
    assert!(!s.client.is_transaction_executed(&tx_id));
}

#[test]
fn test_reentrant_execute_is_rejected() {
    let s = Setup::new(2, 1);
    let attacker = s.env.register(Reentrant, ());

    // The attacker's call re-enters execute for the transaction that is
    // calling it.
    let args = reenter_args(&s.env, &s.client.address, 1, &s.voter(0));
    let tx_id = s
        .client
        .create_transaction(&s.owner, &s.call(&attacker, "reenter", args));
    assert_eq!(tx_id, 1);
    s.approve_transaction_by(tx_id, 1);

    // The host refuses the nested call, so the attacker's invocation fails
    // and the outer execution reports a failed call.
    assert_eq!(
        s.client.try_execute_transaction(&tx_id, &s.voter(1)),
        Err(Ok(ExecutorError::ExecutionFailed))
    );
    assert!(!s.client.is_transaction_executed(&tx_id));
}

#[test]
fn test_gateway_guard() {
    let s = Setup::new(2, 1);

    s.env.as_contract(&s.client.address, || {
        let gateway = Gateway::open(&s.env).unwrap();
        assert!(matches!(
            Gateway::open(&s.env),
            Err(ExecutorError::ReentrantCall)
        ));
        gateway.close();
        assert!(Gateway::open(&s.env).is_ok());
    });
}

#[test]
fn test_quorum_scenario() {
    // threshold 2 of 3: one approval is not enough, two are.
    let s = Setup::new(3, 2);
    let recipient = Address::generate(&s.env);
    let tx_id = s.client.create_transaction(&s.owner, &s.transfer(&recipient, 0));

    s.client.approve_transaction(&tx_id, &s.voter(0));
    assert_eq!(
        s.client.try_execute_transaction(&tx_id, &s.voter(0)),
        Err(Ok(ExecutorError::NotEnoughApprovals))
    );

    s.client.approve_transaction(&tx_id, &s.voter(1));
    s.client.execute_transaction(&tx_id, &s.voter(0));
    assert!(s.client.get_transaction(&tx_id).executed);
}

#[test]
fn test_duplicate_token_deploy_fails_second_execution() {
    let s = Setup::new(3, 2);
    let registry_id = s.env.register(TokenRegistry, ());
    let registry = TokenRegistryClient::new(&s.env, &registry_id);
    registry.initialize(&s.client.address);

    let name = String::from_str(&s.env, "GOLD");
    let deploy = s.call(
        &registry_id,
        "deploy_token",
        vec![&s.env, name.into_val(&s.env)],
    );

    let first = s.client.create_transaction(&s.owner, &deploy);
    let second = s.client.create_transaction(&s.owner, &deploy);
    s.approve_transaction_by(first, 2);
    s.approve_transaction_by(second, 2);

    s.client.execute_transaction(&first, &s.voter(0));
    assert_eq!(registry.token_id(&name), 1);

    assert_eq!(
        s.client.try_execute_transaction(&second, &s.voter(0)),
        Err(Ok(ExecutorError::ExecutionFailed))
    );
    let tx = s.client.get_transaction(&second);
    assert!(!tx.executed);
    assert_eq!(tx.approvals, 2);
    assert_eq!(registry.token_count(), 1);
}

#[test]
fn test_mint_through_executor() {
    let s = Setup::new(3, 2);
    let registry_id = s.env.register(TokenRegistry, ());
    let registry = TokenRegistryClient::new(&s.env, &registry_id);
    registry.initialize(&s.client.address);

    let name = String::from_str(&s.env, "GOLD");
    let alice = Address::generate(&s.env);
    let calls = vec![
        &s.env,
        s.call(&registry_id, "deploy_token", vec![&s.env, name.into_val(&s.env)]),
        s.call(
            &registry_id,
            "mint",
            (name.clone(), alice.clone(), 100i128).into_val(&s.env),
        ),
    ];

    let batch_id = s.client.create_batch(&s.owner, &calls);
    s.approve_batch_by(batch_id, 2);
    s.client.execute_batch(&batch_id, &s.voter(0));

    assert_eq!(registry.balance(&name, &alice), 100);
    assert_eq!(registry.total_supply(&name), 100);
}
