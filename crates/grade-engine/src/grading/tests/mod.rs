mod aggregation;
mod common;
mod engine;
