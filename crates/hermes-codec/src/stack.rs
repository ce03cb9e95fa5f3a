//! The codec registry.
//!
//! A [`CodecStack`] holds one default codec and an ordered list of
//! alternates, all with distinct media types. It is immutable once built and
//! can be shared across threads.

use crate::codec::Codec;
use crate::error::{CodecError, StackError};
use crate::media::{self, parse_accept};
use std::fmt;
use std::sync::Arc;

struct Entry {
    essence: String,
    codec: Arc<dyn Codec>,
}

/// An ordered set of codecs with a default.
pub struct CodecStack {
    // entries[0] is the default
    entries: Vec<Entry>,
}

impl CodecStack {
    /// Starts building a stack around `default`.
    pub fn builder(default: impl Codec) -> CodecStackBuilder {
        CodecStackBuilder::new(Arc::new(default))
    }

    /// Creates a stack with only a default codec.
    pub fn single(default: impl Codec) -> Result<Self, StackError> {
        Self::builder(default).build()
    }

    /// Returns the default codec.
    pub fn default_codec(&self) -> &dyn Codec {
        self.entries[0].codec.as_ref()
    }

    /// Returns every codec, default first.
    pub fn codecs(&self) -> impl Iterator<Item = &dyn Codec> + '_ {
        self.entries.iter().map(|entry| entry.codec.as_ref())
    }

    /// Returns every media type, default first.
    pub fn media_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.essence.as_str())
    }

    /// Finds the codec for a `Content-Type` value.
    ///
    /// Matching ignores parameters and case. There is no fallback: an
    /// unregistered media type is an error.
    pub fn resolve_for_decode(&self, content_type: &str) -> Result<&dyn Codec, CodecError> {
        let wanted = media::essence(content_type);
        self.entries
            .iter()
            .find(|entry| entry.essence == wanted)
            .map(|entry| entry.codec.as_ref())
            .ok_or_else(|| CodecError::unsupported(wanted))
    }

    /// Chooses the codec for an `Accept` value.
    ///
    /// Ranges are tried in descending quality. `*/*` selects the default
    /// codec and `type/*` selects the first registered codec of that type.
    /// When the header is absent or nothing matches, the default codec is
    /// returned.
    pub fn resolve_for_encode(&self, accept: Option<&str>) -> &dyn Codec {
        let Some(accept) = accept.map(str::trim).filter(|a| !a.is_empty()) else {
            return self.default_codec();
        };

        for range in parse_accept(accept) {
            if range.is_any() {
                return self.default_codec();
            }
            if let Some(entry) = self
                .entries
                .iter()
                .find(|entry| range.matches(&entry.essence))
            {
                return entry.codec.as_ref();
            }
        }

        tracing::trace!(accept, "no acceptable codec, using default");
        self.default_codec()
    }
}

impl fmt::Debug for CodecStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecStack")
            .field("media_types", &self.media_types().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`CodecStack`].
pub struct CodecStackBuilder {
    default: Arc<dyn Codec>,
    alternates: Vec<Arc<dyn Codec>>,
}

impl CodecStackBuilder {
    /// Creates a builder from a shared default codec.
    pub fn new(default: Arc<dyn Codec>) -> Self {
        Self {
            default,
            alternates: Vec::new(),
        }
    }

    /// Appends an alternate codec.
    pub fn alternate(self, codec: impl Codec) -> Self {
        self.alternate_shared(Arc::new(codec))
    }

    /// Appends a shared alternate codec.
    pub fn alternate_shared(mut self, codec: Arc<dyn Codec>) -> Self {
        self.alternates.push(codec);
        self
    }

    /// Validates the media types and builds the stack.
    pub fn build(self) -> Result<CodecStack, StackError> {
        let mut entries: Vec<Entry> = Vec::with_capacity(1 + self.alternates.len());

        for codec in std::iter::once(self.default).chain(self.alternates) {
            let raw = codec.media_type();
            if !media::is_valid(raw) {
                return Err(StackError::InvalidMediaType {
                    value: raw.to_string(),
                });
            }
            let essence = media::essence(raw);
            if entries.iter().any(|entry| entry.essence == essence) {
                return Err(StackError::DuplicateMediaType { media_type: essence });
            }
            entries.push(Entry { essence, codec });
        }

        Ok(CodecStack { entries })
    }
}
