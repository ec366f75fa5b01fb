pub mod balance;
pub mod expense;
pub mod group;
pub mod money;
pub mod pairing;
pub mod participant;
pub mod settlement;
