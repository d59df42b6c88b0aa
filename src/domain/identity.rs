use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

// ============================================================================
// Identifiers and Injected Capabilities
// ============================================================================
//
// Aggregate identifiers are opaque UUID newtypes with a canonical string
// form. Identifier generation and the wall clock are capabilities handed to
// the command handlers, never reached through globals inside the domain.
//
// ============================================================================

/// Failure to parse an identifier from its canonical string form
#[derive(Debug, thiserror::Error)]
#[error("Invalid {kind} identifier '{value}': {source}")]
pub struct InvalidId {
    pub kind: &'static str,
    pub value: String,
    #[source]
    pub source: uuid::Error,
}

macro_rules! aggregate_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self).map_err(|source| InvalidId {
                    kind: $kind,
                    value: s.to_string(),
                    source,
                })
            }
        }
    };
}

aggregate_id!(
    /// Identity of an Order aggregate
    OrderId,
    "order"
);

aggregate_id!(
    /// Identity of a Customer
    CustomerId,
    "customer"
);

/// Source of fresh 128-bit identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random (v4) identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Source of "now" for lifecycle timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}


// ============================================================================
// Unit Tests
// ============================================================================
