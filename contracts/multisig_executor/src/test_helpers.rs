#![cfg(test)]

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, testutils::Address as _, token, Address,
    Env, IntoVal, Symbol, Val, Vec,
};

use crate::{Call, Invocation, MultiSigExecutor, MultiSigExecutorClient, Payload};

/// An initialized executor with a funded-on-demand value token.
pub struct Setup<'a> {
    pub env: Env,
    pub client: MultiSigExecutorClient<'a>,
    pub owner: Address,
    pub voters: Vec<Address>,
    pub token: token::TokenClient<'a>,
    pub asset: token::StellarAssetClient<'a>,
}

impl<'a> Setup<'a> {
    pub fn new(voter_count: u32, threshold: u32) -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register(MultiSigExecutor, ());
        let client = MultiSigExecutorClient::new(&env, &contract_id);

        let sac = env.register_stellar_asset_contract_v2(Address::generate(&env));
        let token = token::TokenClient::new(&env, &sac.address());
        let asset = token::StellarAssetClient::new(&env, &sac.address());

        let owner = Address::generate(&env);
        let voters = create_test_voters(&env, voter_count);
        client.initialize(&owner, &voters, &threshold, &sac.address());

        Self {
            env,
            client,
            owner,
            voters,
            token,
            asset,
        }
    }

    pub fn voter(&self, index: u32) -> Address {
        self.voters.get_unchecked(index)
    }

    /// Gives the executor `amount` of the value token.
    pub fn fund(&self, amount: i128) {
        self.asset.mint(&self.client.address, &amount);
    }

    pub fn transfer(&self, to: &Address, value: i128) -> Call {
        Call {
            target: to.clone(),
            value,
            payload: Payload::Transfer,
        }
    }

    pub fn call(&self, target: &Address, function: &str, args: Vec<Val>) -> Call {
        Call {
            target: target.clone(),
            value: 0,
            payload: Payload::Invoke(Invocation {
                function: Symbol::new(&self.env, function),
                args,
            }),
        }
    }

    pub fn no_args(&self) -> Vec<Val> {
        Vec::new(&self.env)
    }

    /// Approves `tx_id` with the first `count` voters.
    pub fn approve_transaction_by(&self, tx_id: u64, count: u32) {
        for i in 0..count {
            self.client.approve_transaction(&tx_id, &self.voter(i));
        }
    }

    pub fn approve_batch_by(&self, batch_id: u64, count: u32) {
        for i in 0..count {
            self.client.approve_batch(&batch_id, &self.voter(i));
        }
    }

    pub fn register_target(&self) -> TargetClient<'a> {
        let id = self.env.register(Target, ());
        TargetClient::new(&self.env, &id)
    }
}

pub fn create_test_voters(env: &Env, count: u32) -> Vec<Address> {
    let mut voters = Vec::new(env);
    for _ in 0..count {
        voters.push_back(Address::generate(env));
    }
    voters
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum TargetError {
    Refused = 1,
}

/// Call target that counts pings, records tagged calls and can be told to fail.
#[contract]
pub struct Target;

#[contractimpl]
impl Target {
    pub fn ping(env: Env) -> u32 {
        let hits = Self::hits(env.clone()) + 1;
        env.storage().instance().set(&symbol_short!("hits"), &hits);
        hits
    }

    pub fn hits(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&symbol_short!("hits"))
            .unwrap_or(0)
    }

    /// Appends `tag` so tests can read back the order of calls.
    pub fn record(env: Env, tag: u32) {
        let mut records = Self::records(env.clone());
        records.push_back(tag);
        env.storage()
            .instance()
            .set(&symbol_short!("records"), &records);
    }

    pub fn records(env: Env) -> Vec<u32> {
        env.storage()
            .instance()
            .get(&symbol_short!("records"))
            .unwrap_or(Vec::new(&env))
    }

    pub fn refuse(_env: Env) -> Result<(), TargetError> {
        Err(TargetError::Refused)
    }
}

/// Call target that tries to execute the same transaction again from inside
/// the executor's call.
#[contract]
pub struct Reentrant;

#[contractimpl]
impl Reentrant {
    pub fn reenter(env: Env, executor: Address, tx_id: u64, voter: Address) {
        MultiSigExecutorClient::new(&env, &executor).execute_transaction(&tx_id, &voter);
    }
}

pub fn reenter_args(env: &Env, executor: &Address, tx_id: u64, voter: &Address) -> Vec<Val> {
    (executor.clone(), tx_id, voter.clone()).into_val(env)
}
