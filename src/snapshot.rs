use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::inference::FuzzySystem;
use crate::outputs::Decision;

/// Shared access to the current system, replaced wholesale on reload.
///
/// Readers clone the `Arc` and evaluate against that snapshot without holding
/// the lock, so a concurrent [`publish`](SystemHandle::publish) never changes
/// a request midway.
#[derive(Debug)]
pub struct SystemHandle {
    current: RwLock<Arc<FuzzySystem>>,
}

impl SystemHandle {
    pub fn new(system: FuzzySystem) -> Self {
        Self {
            current: RwLock::new(Arc::new(system)),
        }
    }

    pub fn snapshot(&self) -> Arc<FuzzySystem> {
        Arc::clone(&self.current.read())
    }

    /// Swaps in `system` and returns the snapshot it replaced.
    pub fn publish(&self, system: FuzzySystem) -> Arc<FuzzySystem> {
        let next = Arc::new(system);

        tracing::info!(
            variables = next.variables().len(),
            rules = next.rules().len(),
            "publishing fuzzy system snapshot"
        );

        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Named inputs are used here because [`Inputs`](crate::Inputs) keys are
    /// tied to the snapshot that resolved them.
    pub fn infer_named(&self, named: &HashMap<String, f64>) -> Decision {
        self.snapshot().infer_named(named)
    }
}

impl From<FuzzySystem> for SystemHandle {
    fn from(system: FuzzySystem) -> Self {
        Self::new(system)
    }
}
