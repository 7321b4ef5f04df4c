//! Context window assembly.

pub mod assembler;

pub use assembler::ContextAssembler;
