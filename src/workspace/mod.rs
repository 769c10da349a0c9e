pub(crate) mod navigator;
pub(crate) mod status;

pub(crate) use navigator::{Navigator, Outcome, Pacing};
