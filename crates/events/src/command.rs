use medrem_core::MedicationId;

/// A command targets a specific medication record.
///
/// Commands represent **intent** ("mark this dose taken"); the aggregate turns
/// accepted intent into events.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    fn target_id(&self) -> MedicationId;
}
