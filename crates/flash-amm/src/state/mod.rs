pub mod address;
pub mod checkpoint;
pub mod ledger;
pub mod lock;
pub mod pool;
pub mod pool_key;
pub mod reserves;

pub use address::*;
pub use checkpoint::*;
pub use ledger::*;
pub use lock::*;
pub use pool::*;
pub use pool_key::*;
pub use reserves::*;
