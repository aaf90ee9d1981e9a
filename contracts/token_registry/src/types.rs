use soroban_sdk::{contractevent, contracttype, Address, String};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    TokenCount,
    TokenId(String),
    TokenName(u32),
    Supply(u32),
    Balance(u32, Address),
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenDeployed {
    #[topic]
    pub name: String,
    pub token_id: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Minted {
    #[topic]
    pub name: String,
    pub to: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Burned {
    #[topic]
    pub name: String,
    pub from: Address,
    pub amount: i128,
}
