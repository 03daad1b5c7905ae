//! Serverless function endpoints, served under `/functions/v1`.

mod payments;


pub use payments::*;
