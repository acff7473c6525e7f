mod cache_tests;
mod common;
mod script_tests;
