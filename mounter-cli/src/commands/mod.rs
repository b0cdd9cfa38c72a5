pub mod entries;
pub mod inspect;
pub mod tree;
