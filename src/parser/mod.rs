pub mod blocks;
pub mod departments;
pub mod sections;
pub mod table;
