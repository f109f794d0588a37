mod common;
mod reputation;
mod service;
