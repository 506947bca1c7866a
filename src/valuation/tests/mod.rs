mod adjustments;
mod common;
mod condition;
mod engine;
mod transaction;
