mod helpers;
mod window_tests;
