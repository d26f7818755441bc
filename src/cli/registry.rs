use std::collections::BTreeMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One shell command: how it is invoked, described and completed.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    /// Other words that run the same handler.
    pub aliases: &'static [&'static str],
    /// Second words offered by tab completion.
    pub actions: &'static [&'static str],
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            aliases: &[],
            actions: &[],
        }
    }

    pub const fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn with_actions(mut self, actions: &'static [&'static str]) -> Self {
        self.actions = actions;
        self
    }

    fn words(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.name).chain(self.aliases.iter().copied())
    }
}

/// Commands in registration order, looked up by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second entry with an existing name takes over its slot; words it no
    /// longer claims stop resolving.
    pub fn register(&mut self, entry: CommandEntry) {
        let existing = self.lookup.get(entry.name).copied();
        let slot = match existing {
            Some(slot) => {
                self.lookup.retain(|_, index| *index != slot);
                self.entries[slot] = entry;
                slot
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        for word in self.entries[slot].words() {
            if let Some(previous) = self.lookup.insert(word, slot) {
                if previous != slot {
                    tracing::warn!(word, "command word registered twice; last one wins");
                }
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<&CommandEntry> {
        self.lookup.get(word).map(|&slot| &self.entries[slot])
    }

    pub fn list(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// Every word that dispatches, aliases included, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lookup.keys().copied()
    }

    pub fn handler(&self, word: &str) -> Option<CommandHandler> {
        self.get(word).map(|entry| entry.handler)
    }

    pub fn actions(&self, word: &str) -> &'static [&'static str] {
        self.get(word)
            .map(|entry| entry.actions)
            .unwrap_or(&[])
    }
}
