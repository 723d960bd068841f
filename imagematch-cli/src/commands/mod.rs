pub mod index;
pub mod reset;
pub mod results;
pub mod search;
