pub mod engine;
pub mod error;
pub mod fasta;
pub mod io;
pub mod stats;
