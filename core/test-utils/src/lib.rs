pub mod child_chain;
pub mod events;
pub mod keys;
pub mod logging;
pub mod random;
pub mod sink;
pub mod votes;
