use soroban_sdk::Env;

use crate::errors::ExecutorError;
use crate::events::ThresholdChanged;
use crate::types::DataKey;

pub(crate) fn threshold(env: &Env) -> Result<u32, ExecutorError> {
    env.storage()
        .instance()
        .get(&DataKey::Threshold)
        .ok_or(ExecutorError::NotInitialized)
}

/// Only the zero check applies here. The voter-count bound is enforced at
/// initialization and nowhere else.
pub(crate) fn set_threshold(env: &Env, threshold: u32) -> Result<(), ExecutorError> {
    if threshold == 0 {
        return Err(ExecutorError::InvalidThreshold);
    }
    let previous = self::threshold(env)?;
    env.storage().instance().set(&DataKey::Threshold, &threshold);

    ThresholdChanged {
        previous,
        threshold,
    }
    .publish(env);
    Ok(())
}

pub(crate) fn is_satisfied(env: &Env, approvals: u32) -> Result<bool, ExecutorError> {
    Ok(approvals >= threshold(env)?)
}
