use rand::Rng;
use rand::seq::SliceRandom;

pub const DEFAULT_PRUNE_TARGET: usize = 10;

/// Uniform sample of `target` items without replacement when there are more
/// than `target`; otherwise the input unchanged.
pub fn prune<T>(items: Vec<T>, target: usize) -> Vec<T> {
    prune_with(&mut rand::thread_rng(), items, target)
}

pub fn prune_with<T, R>(rng: &mut R, mut items: Vec<T>, target: usize) -> Vec<T>
where
    R: Rng + ?Sized,
{
    if items.len() <= target {
        return items;
    }

    tracing::debug!(from = items.len(), to = target, "Pruning flashcards");
    items.shuffle(rng);
    items.truncate(target);
    items
}
