pub mod front;
pub mod matching;
