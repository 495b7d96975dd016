pub(crate) mod config;
pub(crate) mod node;
pub(crate) mod select;

pub(crate) use config::ConfigArgs;
pub(crate) use select::SelectArgs;
