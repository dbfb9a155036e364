/*!
 * Simulation driver tests entry point
 */

#[path = "simulation/config_test.rs"]
mod config_test;

#[path = "simulation/scenario_test.rs"]
mod scenario_test;

#[path = "simulation/stepping_test.rs"]
mod stepping_test;
