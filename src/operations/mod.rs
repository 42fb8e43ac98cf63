pub mod clustering;
pub mod export;
pub mod picking;
