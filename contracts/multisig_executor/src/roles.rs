use soroban_sdk::{Address, Env};

use crate::errors::ExecutorError;
use crate::events::{RoleGranted, RoleRevoked};
use crate::storage;
use crate::types::{DataKey, Role};

fn count_key(role: Role) -> DataKey {
    match role {
        Role::Owner => DataKey::OwnerCount,
        Role::Voter => DataKey::VoterCount,
    }
}

pub(crate) fn has_role(env: &Env, principal: &Address, role: Role) -> bool {
    env.storage()
        .instance()
        .has(&DataKey::Role(principal.clone(), role))
}

pub(crate) fn role_count(env: &Env, role: Role) -> u32 {
    env.storage().instance().get(&count_key(role)).unwrap_or(0u32)
}

/// Gate for every privileged entry point. Runs before any ledger state is
/// touched.
pub(crate) fn authorize(env: &Env, caller: &Address, role: Role) -> Result<(), ExecutorError> {
    storage::require_initialized(env)?;
    caller.require_auth();
    if !has_role(env, caller, role) {
        return Err(ExecutorError::Unauthorized);
    }
    Ok(())
}

pub(crate) fn grant(env: &Env, principal: &Address, role: Role) -> Result<(), ExecutorError> {
    if has_role(env, principal, role) {
        return Err(match role {
            Role::Owner => ExecutorError::AlreadyOwner,
            Role::Voter => ExecutorError::AlreadyVoter,
        });
    }

    env.storage()
        .instance()
        .set(&DataKey::Role(principal.clone(), role), &true);
    env.storage()
        .instance()
        .set(&count_key(role), &(role_count(env, role) + 1));

    RoleGranted {
        role,
        principal: principal.clone(),
    }
    .publish(env);
    Ok(())
}

/// Removing a voter never re-checks the threshold, so `threshold > voters`
/// is reachable and blocks execution until an owner lowers it.
pub(crate) fn revoke(env: &Env, principal: &Address, role: Role) -> Result<(), ExecutorError> {
    if !has_role(env, principal, role) {
        return Err(match role {
            Role::Owner => ExecutorError::NotOwner,
            Role::Voter => ExecutorError::NotVoter,
        });
    }

    let remaining = role_count(env, role) - 1;
    if role == Role::Owner && remaining == 0 {
        return Err(ExecutorError::LastOwner);
    }

    env.storage()
        .instance()
        .remove(&DataKey::Role(principal.clone(), role));
    env.storage().instance().set(&count_key(role), &remaining);

    RoleRevoked {
        role,
        principal: principal.clone(),
    }
    .publish(env);
    Ok(())
}
