use super::queue::PriorityQueue;
use super::registry::StatusRegistry;
use super::types::*;

use std::sync::Arc;

/// Splits a submission into fixed-size batches and records them.
///
/// Every produced batch is registered in the `StatusRegistry` as `NotStarted`
/// and referenced by a new entry at the back of the `PriorityQueue`.
pub struct BatchPartitioner {
    max_batch_size: usize,
    registry: Arc<StatusRegistry>,
    queue: Arc<PriorityQueue>,
}

impl BatchPartitioner {
    pub fn new(
        max_batch_size: usize,
        registry: Arc<StatusRegistry>,
        queue: Arc<PriorityQueue>,
    ) -> Self {
        Self {
            max_batch_size: max_batch_size.max(1),
            registry,
            queue,
        }
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Partitions `ids` into batches of at most `max_batch_size`, in input order.
    ///
    /// All batches share one `created_at` timestamp. An empty `ids` list
    /// produces no batch.
    pub fn partition(
        &self,
        ingestion_id: &IngestionId,
        ids: &[u64],
        priority: Priority,
    ) -> Vec<BatchRecord> {
        let created_at = now_ms();

        let batches: Vec<BatchRecord> = ids
            .chunks(self.max_batch_size)
            .map(|chunk| BatchRecord {
                batch_id: BatchId::new(),
                ingestion_id: ingestion_id.clone(),
                ids: chunk.to_vec(),
                priority,
                created_at,
                status: BatchStatus::NotStarted,
                started_at: None,
                finished_at: None,
                last_error: None,
            })
            .collect();

        for batch in &batches {
            self.registry.register(batch.clone());
        }
        self.queue.extend(batches.iter().map(QueueEntry::for_batch));

        tracing::debug!(
            "Partitioned {} ids of ingestion {} into {} batches",
            ids.len(),
            ingestion_id,
            batches.len()
        );

        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partitioner(size: usize) -> (BatchPartitioner, Arc<StatusRegistry>, Arc<PriorityQueue>) {
        let registry = Arc::new(StatusRegistry::new());
        let queue = Arc::new(PriorityQueue::new());
        (
            BatchPartitioner::new(size, registry.clone(), queue.clone()),
            registry,
            queue,
        )
    }

    #[test]
    fn test_seven_ids_yield_three_three_one() {
        let (partitioner, _, _) = partitioner(3);
        let ingestion_id = IngestionId::new();

        let batches = partitioner.partition(&ingestion_id, &[1, 2, 3, 4, 5, 6, 7], Priority::High);

        let sizes: Vec<usize> = batches.iter().map(|b| b.ids.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn test_concatenation_reconstructs_input() {
        let (partitioner, _, _) = partitioner(3);
        let ids: Vec<u64> = (1..=20).rev().collect();

        for len in 0..ids.len() {
            let batches = partitioner.partition(&IngestionId::new(), &ids[..len], Priority::Low);

            let rebuilt: Vec<u64> = batches.iter().flat_map(|b| b.ids.clone()).collect();
            assert_eq!(rebuilt, ids[..len].to_vec());
            assert!(batches.iter().all(|b| !b.ids.is_empty() && b.ids.len() <= 3));
        }
    }

    #[test]
    fn test_batches_share_timestamp_and_have_unique_ids() {
        let (partitioner, _, _) = partitioner(2);

        let batches = partitioner.partition(&IngestionId::new(), &[1, 2, 3, 4, 5], Priority::Medium);

        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.created_at == batches[0].created_at));
        assert_ne!(batches[0].batch_id, batches[1].batch_id);
        assert_ne!(batches[1].batch_id, batches[2].batch_id);
        assert!(batches.iter().all(|b| b.status == BatchStatus::NotStarted));
    }

    #[test]
    fn test_registers_and_enqueues_each_batch() {
        let (partitioner, registry, queue) = partitioner(3);
        let ingestion_id = IngestionId::new();

        let batches = partitioner.partition(&ingestion_id, &[10, 20, 30, 40], Priority::High);

        let listed = registry.list_batches(&ingestion_id).unwrap();
        let expected: Vec<BatchId> = batches.iter().map(|b| b.batch_id.clone()).collect();
        assert_eq!(listed, expected);

        let queued: Vec<BatchId> = queue.snapshot().into_iter().map(|e| e.batch_id).collect();
        assert_eq!(queued, expected);
        assert!(queue.snapshot().iter().all(|e| e.weight == 1));
    }

    #[test]
    fn test_empty_ids_create_nothing() {
        let (partitioner, registry, queue) = partitioner(3);
        let ingestion_id = IngestionId::new();

        let batches = partitioner.partition(&ingestion_id, &[], Priority::High);

        assert!(batches.is_empty());
        assert!(queue.is_empty());
        assert!(!registry.contains_ingestion(&ingestion_id));
    }
}
