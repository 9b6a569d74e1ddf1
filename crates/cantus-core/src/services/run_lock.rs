use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::errors::CoreError;

/// Garantiza que solo haya una ejecución del pipeline en vuelo.
///
/// Un segundo disparo mientras otra ejecución sigue activa se rechaza con
/// [`CoreError::RunInFlight`]; nunca se intercalan.
#[derive(Debug, Clone, Default)]
pub struct RunLock {
  slot: Arc<Mutex<()>>,
}

/// Mientras exista, la ejecución se considera activa.
#[derive(Debug)]
pub struct RunGuard {
  _slot: OwnedMutexGuard<()>,
}

impl RunLock {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn try_acquire(&self) -> Result<RunGuard, CoreError> {
    Arc::clone(&self.slot).try_lock_owned().map(|slot| RunGuard { _slot: slot }).map_err(|_| CoreError::RunInFlight)
  }

  pub fn is_running(&self) -> bool {
    self.slot.try_lock().is_err()
  }
}
