use async_trait::async_trait;
use fabcar_chaincode::ledger::{LedgerError, ResultsIterator};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Iterator over results collected when the cursor was opened. Counts as
/// open on its ledger until dropped.
pub(crate) struct MemoryIterator<T> {
    results: std::vec::IntoIter<T>,
    open_iterators: Arc<AtomicUsize>,
}

impl<T> MemoryIterator<T> {
    pub(crate) fn new(results: Vec<T>, open_iterators: Arc<AtomicUsize>) -> Self {
        let _previous = open_iterators.fetch_add(1, Ordering::SeqCst);
        Self {
            results: results.into_iter(),
            open_iterators,
        }
    }
}

impl<T> Drop for MemoryIterator<T> {
    fn drop(&mut self) {
        let _previous = self.open_iterators.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<T: Send> ResultsIterator<T> for MemoryIterator<T> {
    async fn next(&mut self) -> Result<Option<T>, LedgerError> {
        Ok(self.results.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropping_releases_the_cursor() {
        let open = Arc::new(AtomicUsize::new(0));

        let mut iterator = MemoryIterator::new(vec![1, 2], open.clone());
        assert_eq!(open.load(Ordering::SeqCst), 1);
        assert_eq!(iterator.next().await.unwrap(), Some(1));

        drop(iterator);
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }
}
