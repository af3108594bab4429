/// Pure math and rules: no terminal, no randomness, no mutable state.

pub mod combination;
pub mod hint;
pub mod rules;
