/// A domain-agnostic event.
///
/// Events are immutable facts. Some of them change state (a dose was taken),
/// others only describe a condition worth telling the user about (stock is
/// running low).
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "medication.dose.taken").
    fn event_type(&self) -> &'static str;

    /// Whether the event is an alert for the user rather than a state change.
    fn is_alert(&self) -> bool {
        false
    }
}
