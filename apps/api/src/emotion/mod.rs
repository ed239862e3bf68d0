pub mod badges;
pub mod classifier;
pub mod handlers;
pub mod input;
pub mod label;
pub mod lexicon;
pub mod suggestions;
pub mod tracker;
