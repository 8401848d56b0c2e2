//! Scenario tests spanning the hierarchy, bounds and culling

mod culling_integration;
