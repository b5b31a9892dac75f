use bridge_types::{BlockNumber, BlockRange, Checkpoint};

/// A trait for the admitted checkpoint store, encapsulating the operations the verifier needs.
///
/// Admitted checkpoints are append-only: there is no way to replace or remove one. It is
/// expected that implementations are thread-safe and can be shared between multiple threads.
pub trait CheckpointDatabase: Clone + Send + Sync {
    /// The database reader type.
    type Query: CheckpointDatabaseQuery;

    /// Get the query instance for this database.
    fn query(&self) -> Self::Query;

    /// Append the checkpoint unless its block range intersects one already stored, in which
    /// case the stored range is returned and nothing is written. The check and the write are
    /// one atomic step.
    fn insert_if_disjoint(&self, checkpoint: Checkpoint) -> Result<(), BlockRange>;
}

/// A trait for reading the admitted checkpoints.
///
/// There can be many query instances for a given database, and they can be shared between
/// multiple threads.
pub trait CheckpointDatabaseQuery: Clone + Send + Sync {
    /// Returns the range of a stored checkpoint that intersects the given range, if any.
    fn find_overlap(&self, range: &BlockRange) -> Option<BlockRange>;

    /// Returns the checkpoint whose block range contains the given block.
    fn get_covering(&self, block: BlockNumber) -> Option<Checkpoint>;

    /// Returns the first checkpoint whose block range starts after the given block.
    fn get_next(&self, after: BlockNumber) -> Option<Checkpoint>;

    /// Returns the checkpoint with the highest block range.
    fn get_latest(&self) -> Option<Checkpoint>;

    /// The number of admitted checkpoints.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
