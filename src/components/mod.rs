pub(crate) mod hooks;
pub(crate) mod ui;
