mod common;

mod bundle_tests;
mod plan_tests;
mod routes_tests;
