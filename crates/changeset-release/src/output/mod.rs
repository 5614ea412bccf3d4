mod action;
mod sink;

pub(crate) use action::ActionOutputs;
pub(crate) use sink::write_outputs;
