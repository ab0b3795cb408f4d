//! # Misc utilities
//!
//! This module contains some utilities that are used but not specific to `noteworthy`.
use std::marker::PhantomData;

/// Define a serializable integer ID type with a display format
#[macro_export]
macro_rules! make_id {
    (#[$doc:meta] $name:ident, $key:literal) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(into = "u64", from = "u64")]
        #[$doc]
        pub struct $name(u64);

        impl $name {
            /// Integer value
            pub fn int_val(&self) -> u64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, $key, self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::num::ParseIntError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s.rsplit('#').next().unwrap_or(s);
                digits.trim().parse().map($name)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> $name {
                $name(id)
            }
        }
    };
}

/// A counter that produces IDs of type T
#[derive(Debug)]
pub struct Counter<T>(u64, PhantomData<fn() -> T>);

impl<T> Default for Counter<T> {
    fn default() -> Self {
        Self(0, PhantomData)
    }
}

impl<T> Counter<T> {
    /// A counter whose first value is `start`
    pub fn starting_at(start: u64) -> Self {
        Self(start, PhantomData)
    }
}

impl<T: From<u64>> Counter<T> {
    /// Get the next value from this counter
    pub fn next(&mut self) -> T {
        let id = self.0;
        self.0 = id + 1;
        T::from(id)
    }
}

/// Whether a loop should go on
pub enum LoopState<T> {
    Break(T),
    Continue,
}
