pub(crate) mod common;
mod transitions;
