pub mod assets;
pub mod persistence;
pub mod table;
pub mod version;
