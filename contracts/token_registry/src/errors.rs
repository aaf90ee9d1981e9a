use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    TokenAlreadyExists = 3,
    TokenNotFound = 4,
    InvalidTokenAddress = 5,
    InvalidAmount = 6,
    InsufficientBalance = 7,
}
