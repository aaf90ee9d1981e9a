//! Named fungible-token registry.
//!
//! Each token has a unique name and a numeric id, and the two map one to one.
//! Only the configured admin may deploy, mint or burn. In practice the admin
//! is a multisig executor, so every supply change carries a quorum.

use soroban_sdk::{contract, contractimpl, Address, Env, String};

use crate::errors::RegistryError;
use crate::types::{Burned, DataKey, Minted, TokenDeployed};

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
const BALANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const BALANCE_LIFETIME_THRESHOLD: u32 = BALANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

#[contract]
pub struct TokenRegistry;

#[contractimpl]
impl TokenRegistry {
    pub fn initialize(env: Env, admin: Address) -> Result<(), RegistryError> {
        if env.storage().instance().has(&DataKey::Admin) {
            return Err(RegistryError::AlreadyInitialized);
        }
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::TokenCount, &0u32);
        Ok(())
    }

    pub fn admin(env: Env) -> Result<Address, RegistryError> {
        load_admin(&env)
    }

    pub fn deploy_token(env: Env, name: String) -> Result<u32, RegistryError> {
        require_admin(&env)?;

        let name_key = DataKey::TokenId(name.clone());
        if env.storage().persistent().has(&name_key) {
            return Err(RegistryError::TokenAlreadyExists);
        }

        let token_id = Self::token_count(env.clone()) + 1;
        env.storage().instance().set(&DataKey::TokenCount, &token_id);
        write(&env, &name_key, &token_id);
        write(&env, &DataKey::TokenName(token_id), &name);
        write(&env, &DataKey::Supply(token_id), &0i128);

        TokenDeployed { name, token_id }.publish(&env);
        Ok(token_id)
    }

    pub fn mint(env: Env, name: String, to: Address, amount: i128) -> Result<(), RegistryError> {
        require_admin(&env)?;
        if amount <= 0 {
            return Err(RegistryError::InvalidAmount);
        }
        let token_id = Self::token_id(env.clone(), name.clone())?;

        let balance = balance_of(&env, token_id, &to)
            .checked_add(amount)
            .ok_or(RegistryError::InvalidAmount)?;
        let supply = supply_of(&env, token_id)
            .checked_add(amount)
            .ok_or(RegistryError::InvalidAmount)?;
        write(&env, &DataKey::Balance(token_id, to.clone()), &balance);
        write(&env, &DataKey::Supply(token_id), &supply);

        Minted { name, to, amount }.publish(&env);
        Ok(())
    }

    pub fn burn(env: Env, name: String, from: Address, amount: i128) -> Result<(), RegistryError> {
        require_admin(&env)?;
        if amount <= 0 {
            return Err(RegistryError::InvalidAmount);
        }
        let token_id = Self::token_id(env.clone(), name.clone())?;

        let balance = balance_of(&env, token_id, &from);
        if balance < amount {
            return Err(RegistryError::InsufficientBalance);
        }
        let supply = supply_of(&env, token_id) - amount;
        write(&env, &DataKey::Balance(token_id, from.clone()), &(balance - amount));
        write(&env, &DataKey::Supply(token_id), &supply);

        Burned { name, from, amount }.publish(&env);
        Ok(())
    }

    pub fn token_id(env: Env, name: String) -> Result<u32, RegistryError> {
        env.storage()
            .persistent()
            .get(&DataKey::TokenId(name))
            .ok_or(RegistryError::TokenNotFound)
    }

    pub fn token_name(env: Env, token_id: u32) -> Result<String, RegistryError> {
        env.storage()
            .persistent()
            .get(&DataKey::TokenName(token_id))
            .ok_or(RegistryError::InvalidTokenAddress)
    }

    pub fn balance(env: Env, name: String, holder: Address) -> Result<i128, RegistryError> {
        let token_id = Self::token_id(env.clone(), name)?;
        Ok(balance_of(&env, token_id, &holder))
    }

    pub fn total_supply(env: Env, name: String) -> Result<i128, RegistryError> {
        let token_id = Self::token_id(env.clone(), name)?;
        Ok(supply_of(&env, token_id))
    }

    pub fn token_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::TokenCount)
            .unwrap_or(0u32)
    }
}

fn load_admin(env: &Env) -> Result<Address, RegistryError> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(RegistryError::NotInitialized)
}

fn require_admin(env: &Env) -> Result<(), RegistryError> {
    load_admin(env)?.require_auth();
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    Ok(())
}

fn balance_of(env: &Env, token_id: u32, holder: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(token_id, holder.clone()))
        .unwrap_or(0)
}

fn supply_of(env: &Env, token_id: u32) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Supply(token_id))
        .unwrap_or(0)
}

fn write<V>(env: &Env, key: &DataKey, value: &V)
where
    V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
{
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, BALANCE_LIFETIME_THRESHOLD, BALANCE_BUMP_AMOUNT);
}
