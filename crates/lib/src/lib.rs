//! chartsynth-lib: Kubernetes manifest synthesis from a construct tree
//!
//! This crate provides the building blocks for declaring Kubernetes resources
//! in code and emitting them as manifest files:
//! - `Tree`: the construct tree charts, scopes and objects are declared in
//! - `ApiObject`: one resource, rendered with a generated name when none is set
//! - `Chart`: a subtree emitted as a single multi-document YAML file
//! - `App`: the root that synthesizes every chart into an output directory
//! - `Schedule`: rate and cron expressions for a managed scheduler
//!
//! Values that are only known at synthesis time, such as another object's
//! generated name, are declared as placeholders and resolved when the chart is
//! written.

pub mod api_object;
pub mod app;
pub mod chart;
pub mod consts;
pub mod placeholder;
pub mod prune;
pub mod resolve;
pub mod schedule;
pub mod tree;
pub mod util;
pub mod value;
