use soroban_sdk::{contracterror, Error};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ExecutorError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    EmptyVoterList = 4,
    DuplicateVoter = 5,
    InvalidThreshold = 6,
    ThresholdExceedsVoters = 7,
    AlreadyVoter = 8,
    NotVoter = 9,
    AlreadyOwner = 10,
    NotOwner = 11,
    LastOwner = 12,
    TransactionNotFound = 13,
    BatchNotFound = 14,
    AlreadyExecuted = 15,
    AlreadySigned = 16,
    NotEnoughApprovals = 17,
    EmptyBatch = 18,
    InsufficientFunds = 19,
    ExecutionFailed = 20,
    ReentrantCall = 22,
    InvalidValue = 23,
}

/// Contract error codes from here up report a failed batch member; the
/// member's index is `code - BATCH_MEMBER_FAILED_BASE`.
pub const BATCH_MEMBER_FAILED_BASE: u32 = 1_000;

/// The error `execute_batch` returns when the member at `index` fails.
pub fn batch_member_failed(index: u32) -> Error {
    Error::from_contract_error(BATCH_MEMBER_FAILED_BASE + index)
}
