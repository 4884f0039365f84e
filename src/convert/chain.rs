//! Ordered composition of converters.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::context::Context;
use crate::convert::args::{Config, ConvertArgs};
use crate::convert::ConvertService;
use crate::error::Result;

/// Tries converters in order until one produces a config.
///
/// An error from any converter aborts the chain. If every converter passes
/// through, the chain passes through too.
#[derive(Clone, Default)]
pub struct ConverterChain {
    converters: Vec<Arc<dyn ConvertService>>,
}

impl ConverterChain {
    /// Create an empty chain, which always passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a converter to the end of the chain.
    pub fn with(mut self, converter: Arc<dyn ConvertService>) -> Self {
        self.converters.push(converter);
        self
    }

    /// Number of converters in the chain.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether the chain has no converters.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

#[async_trait]
impl ConvertService for ConverterChain {
    async fn convert(&self, ctx: &Context, args: &ConvertArgs) -> Result<Option<Config>> {
        for (index, converter) in self.converters.iter().enumerate() {
            if let Some(config) = converter.convert(ctx, args).await? {
                debug!(index, "converter produced config");
                return Ok(Some(config));
            }
        }
        Ok(None)
    }
}
