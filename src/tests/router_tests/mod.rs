mod list_tests;
mod map_tests;
