//! Screen-level loaders. Each one combines service calls into the data a
//! screen renders and owns the screen's degradation rules.

pub mod home;
pub mod movie;
pub mod search;
