pub mod configuration;
pub mod metal;
pub mod quote;
pub mod setting;
pub mod stone;
