/// Values compared by content (a reminder time, a frequency). Replace, never mutate.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
