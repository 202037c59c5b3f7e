use thiserror::Error;

/// Failures of the probing infrastructure itself.
///
/// A host not answering a probe is never an error anywhere in the engine;
/// these variants cover the cases where the OS facility backing a query or a
/// probe cannot be used at all (missing binary, permission denied, garbage
/// output).
#[derive(Debug, Error)]
pub enum ProbeInfraError {
    #[error("could not invoke `{command}`: {source}")]
    CommandUnavailable {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    CommandFailed {
        command: &'static str,
        status: std::process::ExitStatus,
    },

    #[error("unreadable output from `{command}`: {reason}")]
    UnreadableOutput {
        command: &'static str,
        reason: String,
    },
}
