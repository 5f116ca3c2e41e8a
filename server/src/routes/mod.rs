pub mod actors;
pub mod databases;
pub mod jobs;
pub mod objects;
pub mod pdbs;
pub mod sync;
