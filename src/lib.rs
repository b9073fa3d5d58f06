pub mod database;
pub mod error;
pub mod events;
pub mod flashcard;
pub mod processor;
pub mod runner;
pub mod state;
pub mod telegram;

pub type HandlerResult = Result<(), error::OpError>;
