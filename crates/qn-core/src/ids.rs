//! Typed handles into the network arena.
//!
//! Stations and sinks share the `StationId` space because both are routing
//! targets held in the same `Vec` of nodes.  Generators are addressed by
//! `SourceId`.  Every job receives a network-unique `JobId`, allocated in
//! creation order across all generators.

use std::fmt;

/// Declare an arena handle: a newtype over an integer position, printed as
/// `label#n` in logs and error messages.
macro_rules! arena_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Handle for the `n`-th entry pushed into its arena.
            #[inline]
            pub fn nth(n: usize) -> Self {
                $name(n as $inner)
            }

            /// Position in the owning arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

arena_id! {
    /// A node of the network: an active station or a sink.
    pub struct StationId(u32) => "station";
}

arena_id! {
    /// An arrival generator.
    pub struct SourceId(u32) => "source";
}

arena_id! {
    pub struct JobId(u64) => "job";
}
