/// Section table listing.
pub mod info;
/// Verbosity handling and logger setup.
pub mod logging;
/// Ordered command-line actions.
pub mod pipeline;
/// Interactive directive shell.
pub mod shell;
/// Shared output helpers.
pub mod util;

#[cfg(test)]
mod test_support;
