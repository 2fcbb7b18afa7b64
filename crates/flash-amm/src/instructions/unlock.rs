use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use crate::host::Host;
use crate::manager::PoolManager;
use crate::state::Address;

impl<H: Host> PoolManager<H> {
    /// Open a settlement scope, run `callback` inside it, and close it once
    /// every delta has been settled.
    ///
    /// Any failure restores the engine to its state before the call.
    pub fn unlock<F>(&mut self, sender: Address, data: &[u8], callback: F) -> EngineResult<Vec<u8>>
    where
        F: FnOnce(&mut Self, &[u8]) -> EngineResult<Vec<u8>>,
    {
        self.state.lock.open()?;
        let mut snapshot = self.state.clone();
        snapshot.lock.close();
        info!(sender = %sender, "scope opened");

        let result = callback(self, data).and_then(|output| {
            let outstanding = self.state.ledger.nonzero_count();
            if outstanding != 0 {
                return Err(EngineError::UnsettledBalance(outstanding));
            }
            Ok(output)
        });

        match result {
            Ok(output) => {
                self.state.reserves.clear();
                self.state.lock.close();
                info!(sender = %sender, "scope closed");
                Ok(output)
            }
            Err(err) => {
                debug!(sender = %sender, error = %err, "scope failed, restoring state");
                self.state = snapshot;
                Err(err)
            }
        }
    }
}
