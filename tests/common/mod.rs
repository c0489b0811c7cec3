pub mod harness;
pub mod oracles;
