//! Decide/apply split for stateful records.

/// Something with a stable identity and a count of applied changes.
pub trait AggregateRoot {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Events applied since creation; zero for a record that was never registered.
    fn version(&self) -> u64;
}

/// A record driven by commands.
///
/// `handle` looks at current state and returns the events a command produces
/// without touching anything. `apply` folds one event into state. Stock
/// alerts come out of `handle` like any other event and are delivered by the
/// caller.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    fn apply(&mut self, event: &Self::Event);

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;
}
