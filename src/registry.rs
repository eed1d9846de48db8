use crate::{Error, Params};

/// Outcome of a successful [`LengthRegistry::register`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Registration {
    /// The length was added.
    Registered,
    /// The length was already present; nothing changed.
    AlreadyRegistered,
}

/// The message lengths an engine has been prepared to process, in the order
/// they were registered, each with its derived [`Params`].
#[derive(Debug, Clone, Default)]
pub struct LengthRegistry {
    entries: Vec<Params>,
}

impl LengthRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message length of `len` bits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] if `len` is not a valid message
    /// length. The registry is left unchanged.
    pub fn register(&mut self, len: usize) -> Result<Registration, Error> {
        if self.contains(len) {
            tracing::warn!(len, "message length already registered");
            return Ok(Registration::AlreadyRegistered);
        }

        let params = Params::new(len).map_err(|err| {
            tracing::warn!(len, "rejected invalid message length");
            err
        })?;

        tracing::debug!(
            len,
            split = params.split,
            rounds = params.rounds,
            "registered message length"
        );
        self.entries.push(params);
        Ok(Registration::Registered)
    }

    /// Looks up the parameters of a registered length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnregisteredLength`] if `len` was never registered.
    pub fn ensure_registered(&self, len: usize) -> Result<&Params, Error> {
        self.entries
            .iter()
            .find(|p| p.len == len)
            .ok_or(Error::UnregisteredLength(len))
    }

    /// Returns `true` if `len` has been registered.
    pub fn contains(&self, len: usize) -> bool {
        self.entries.iter().any(|p| p.len == len)
    }

    /// Registered lengths in registration order.
    pub fn lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|p| p.len)
    }
}
