//! Short id generators.

pub mod random_id_generator;

pub use random_id_generator::RandomIdGenerator;
