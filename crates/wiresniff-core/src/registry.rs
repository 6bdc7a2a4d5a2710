//! Decoder registry: `message name -> decode function`.
//!
//! A missing entry is not an error — it means "don't attempt to decode this
//! body"; the `message` event still fires with the looked-up name (possibly
//! `"unknown"`) and the raw IPC bytes attached.
//!
//! Generic over `C`, the region-constants type a decoder needs (field
//! widths, enum tables, etc. that vary per deployment region). `C` is
//! supplied by whichever crate builds the concrete table — `wiresniff-core`
//! itself has no opinion on what a region's constants look like.

use std::{any::Any, collections::HashMap, fmt};

use wiresniff_proto::BufferReader;

use crate::error::DecodeError;

/// A decoded IPC record, type-erased so the registry can hold decoders that
/// return unrelated concrete types.
///
/// `as_any` lets a caller that already knows (from the message name) which
/// concrete type to expect downcast back to it with `downcast_ref`.
pub trait ParsedIpc: fmt::Debug + Send + Sync {
    /// View this value as `dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: fmt::Debug + Send + Sync + 'static> ParsedIpc for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Result of running a single decoder.
pub type DecodeResult = Result<Box<dyn ParsedIpc>, DecodeError>;

type DecodeFn<C> = dyn Fn(&mut BufferReader<'_>, &C) -> DecodeResult + Send + Sync;

/// Map from message name to the function that decodes its IPC body.
pub struct DecoderRegistry<C> {
    decoders: HashMap<&'static str, Box<DecodeFn<C>>>,
}

impl<C> DecoderRegistry<C> {
    /// An empty registry; every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self { decoders: HashMap::new() }
    }

    /// Register a decoder under `name`.
    ///
    /// `name` is expected to already be in lowerCamelCase form, matching
    /// what [`crate::opcodes::OpcodeIndex::lookup`] returns.
    pub fn register(
        &mut self,
        name: &'static str,
        decode: impl Fn(&mut BufferReader<'_>, &C) -> DecodeResult + Send + Sync + 'static,
    ) {
        self.decoders.insert(name, Box::new(decode));
    }

    /// Run the decoder registered for `name`, if any.
    ///
    /// Returns `None` when no decoder is registered — the caller should
    /// still emit `message` with the raw bytes, just without
    /// `parsed_ipc_data`.
    pub fn decode(
        &self,
        name: &str,
        reader: &mut BufferReader<'_>,
        constants: &C,
    ) -> Option<DecodeResult> {
        self.decoders.get(name).map(|decode| decode(reader, constants))
    }

    /// Number of registered decoders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Whether no decoders are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl<C> Default for DecoderRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
