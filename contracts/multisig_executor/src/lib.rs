#![no_std]

mod batches;
mod errors;
mod events;
mod gateway;
mod multisig;
mod quorum;
mod roles;
mod storage;
mod transactions;
mod types;

pub use crate::errors::{batch_member_failed, ExecutorError, BATCH_MEMBER_FAILED_BASE};
pub use crate::multisig::{MultiSigExecutor, MultiSigExecutorClient};
pub use crate::types::{Batch, Call, Invocation, Operation, Payload, Role, Transaction};

mod test_helpers;

mod test;
mod test_batch;
