pub mod bank;
pub mod normalize;

pub use normalize::{Difficulty, Question, RawQuestion};
