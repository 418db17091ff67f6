//! Commands Crate
//!
//! Grammar of the chat commands understood by the Oikonomos bot. Everything
//! here is pure: text goes in, a [`Command`] comes out. Matching names against
//! the user's stored categories, accounts, goals and bills happens in the API
//! crate with the helpers from [`matcher`].
//!
//! # Example
//!
//! ```rust
//! use commands::{parse, Command};
//!
//! match parse("* 5,50 café") {
//!     Command::Record { quick, amount, rest, .. } => {
//!         assert!(quick);
//!         assert_eq!(amount, 5.5);
//!         assert_eq!(rest, "café");
//!     }
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

pub mod amount;
pub mod matcher;
pub mod normalize;
pub mod parser;

pub use amount::parse_amount;
pub use matcher::{best_prefix_match, find_by_name, Named};
pub use normalize::normalize;
pub use parser::{parse, Command, Usage};
