pub mod debounce;
pub mod namer;
pub mod persistence;
pub mod registrar;
pub mod scheduler;
pub mod storage;
