use std::process::Output;

use whoshome_common::error::ProbeInfraError;

/// Extract stdout from a finished OS command, mapping the failure modes the
/// engine cares about. An empty stdout is valid output.
pub(crate) fn stdout_utf8(
    command: &'static str,
    output: Output,
) -> Result<String, ProbeInfraError> {
    if !output.status.success() {
        return Err(ProbeInfraError::CommandFailed {
            command,
            status: output.status,
        });
    }

    String::from_utf8(output.stdout).map_err(|e| ProbeInfraError::UnreadableOutput {
        command,
        reason: e.to_string(),
    })
}
