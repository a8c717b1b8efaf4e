use medrem_core::Aggregate;

use crate::Event;

/// Execute an aggregate command deterministically (no IO, no async).
///
/// 1. **Decide**: calls `aggregate.handle(command)` to get events (no mutation).
/// 2. **Evolve**: applies each event to the aggregate in order.
///
/// The aggregate is mutated in place and the emitted events are returned so
/// the caller can dispatch notifications for them.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: Aggregate,
    A::Event: Event,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        tracing::trace!(event_type = ev.event_type(), "applying event");
        A::apply(aggregate, ev);
    }
    Ok(events)
}
