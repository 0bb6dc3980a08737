//! Command list builder for VRP interface views.
//!
//! Every interface-level command has to be issued inside the interface view
//! (`interface <name>` ... `quit`). [`CommandList`] owns the accumulated
//! commands of one reconcile call and takes care of the view framing: the
//! `interface` line is written lazily on the first command of a block and
//! the closing `quit` only when the block produced something, so an
//! interface that needs no change contributes nothing to the output.

use vrp_types::InterfaceName;

/// Command that enters an interface view.
pub const INTERFACE_CMD: &str = "interface";

/// Command that leaves the current view.
pub const EXIT_CMD: &str = "quit";

/// Prefix that negates a VRP command.
pub const UNDO_PREFIX: &str = "undo";

#[derive(Debug)]
struct Block {
    interface: String,
    emitted: usize,
}

/// Ordered accumulator of CLI commands.
///
/// # Example
///
/// ```
/// use vrp_cfgmgr_common::CommandList;
/// use vrp_types::InterfaceName;
///
/// let mut cmds = CommandList::new();
/// cmds.enter(&InterfaceName::new("GE0/0/1").unwrap());
/// cmds.emit("port link-type access");
/// cmds.exit_if_nonempty();
///
/// cmds.enter(&InterfaceName::new("GE0/0/2").unwrap());
/// cmds.exit_if_nonempty();
///
/// assert_eq!(
///     cmds.into_commands(),
///     vec!["interface GigabitEthernet0/0/1", "port link-type access", "quit"]
/// );
/// ```
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<String>,
    block: Option<Block>,
}

impl CommandList {
    /// Creates an empty command list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a block for `interface`, closing any block still open.
    ///
    /// Nothing is written until the first [`emit`](Self::emit).
    pub fn enter(&mut self, interface: &InterfaceName) {
        self.exit_if_nonempty();
        self.block = Some(Block {
            interface: interface.to_string(),
            emitted: 0,
        });
    }

    /// Appends a command to the current block, writing the `interface` line
    /// first if this is the block's first command.
    ///
    /// Outside of a block the command is appended as a system-view command.
    pub fn emit(&mut self, cmd: impl Into<String>) {
        if let Some(block) = self.block.as_mut() {
            if block.emitted == 0 {
                self.commands
                    .push(format!("{} {}", INTERFACE_CMD, block.interface));
            }
            block.emitted += 1;
        }
        self.commands.push(cmd.into());
    }

    /// Appends the `undo` form of `cmd`.
    pub fn emit_undo(&mut self, cmd: &str) {
        self.emit(format!("{} {}", UNDO_PREFIX, cmd));
    }

    /// Closes the current block, writing `quit` only if the block emitted
    /// at least one command. Returns true if `quit` was written.
    pub fn exit_if_nonempty(&mut self) -> bool {
        match self.block.take() {
            Some(block) if block.emitted > 0 => {
                self.commands.push(EXIT_CMD.to_string());
                true
            }
            _ => false,
        }
    }

    /// Closes any open block and returns the commands.
    pub fn into_commands(mut self) -> Vec<String> {
        self.exit_if_nonempty();
        self.commands
    }
}
