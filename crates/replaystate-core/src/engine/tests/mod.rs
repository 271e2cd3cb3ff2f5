mod generator_tests;
mod property_tests;
mod support;
