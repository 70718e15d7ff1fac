//! Best-effort device renaming.
//!
//! Firmware revisions disagree on the rename command, so the known
//! spellings are tried one after another until the device acknowledges one.

use crate::{hex_lower, Command, CommandClient, Reply};

/// The rename spelling a device accepted
#[derive(Debug, Clone, PartialEq)]
pub struct NamingOutcome {
    /// Command text that was acknowledged
    pub command: String,
    /// The acknowledgement itself
    pub reply: Reply,
}

/// Candidate rename commands, most common first
pub(crate) fn rename_candidates(name: &str) -> Vec<Command> {
    vec![
        Command::new("setDeviceName").param(name),
        Command::new("DeviceName").param(name),
        Command::new("setName").param(name),
        Command::new("setDeviceName").param(hex_lower(name)),
    ]
}

impl CommandClient {
    /// Try each known rename spelling until one is acknowledged with `OK`
    ///
    /// Returns `None` if no spelling was accepted. Renaming is not part of
    /// the stable command vocabulary, so this is expected on some firmware.
    pub fn set_device_name(&self, ip: &str, name: &str) -> Option<NamingOutcome> {
        for command in rename_candidates(name) {
            let Some(reply) = self.send(ip, &command) else {
                continue;
            };

            if reply.is_ok() {
                tracing::info!("{} accepted rename via {}", ip, command.name());
                return Some(NamingOutcome {
                    command: command.to_string(),
                    reply,
                });
            }

            tracing::debug!("{} rejected {}: {}", ip, command, reply.text());
        }

        None
    }
}
