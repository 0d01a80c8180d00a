// Skill assessment: level scale, role catalog, gap analysis and the
// dashboard summary built on top of it.
// Everything except the handlers is pure; no I/O below this module.

pub mod catalog;
pub mod dashboard;
pub mod gap;
pub mod handlers;
pub mod level;
