pub mod traits;

// Gateway implementations
pub mod coincap;
