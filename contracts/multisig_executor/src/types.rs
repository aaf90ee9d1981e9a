use soroban_sdk::{contracttype, Address, Symbol, Val, Vec};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    ValueToken,
    Threshold,
    OwnerCount,
    VoterCount,
    Role(Address, Role),
    Executing,
    TransactionCount,
    Transaction(u64),
    TransactionApproval(u64, Address),
    BatchCount,
    Batch(u64),
    BatchApproval(u64, Address),
}

/// Capability tags a principal may hold. Roles are independent: an owner
/// only approves or executes if it also holds `Voter`.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    Owner = 0,
    Voter = 1,
}

/// A contract function to call on the target after any value transfer.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    pub function: Symbol,
    pub args: Vec<Val>,
}

/// What happens at the target once `value` has been sent.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload {
    Transfer,
    Invoke(Invocation),
}

/// One external call: move `value` of the value token to `target`, then run
/// the payload.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Call {
    pub target: Address,
    pub value: i128,
    pub payload: Payload,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub proposer: Address,
    pub call: Call,
    pub executed: bool,
    pub approvals: u32,
}

/// A batch member. `executed` only flips inside a successful batch run.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Operation {
    pub call: Call,
    pub executed: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    pub id: u64,
    pub proposer: Address,
    pub operations: Vec<Operation>,
    pub executed: bool,
    pub approvals: u32,
    // Sum of member values, fixed at creation.
    pub total_value: i128,
}
