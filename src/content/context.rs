//! Render context and precedence merging

use serde_json::Value;

/// String-keyed structured values handed to the template engine.
///
/// `serde_json`'s `preserve_order` feature keeps key order stable, so
/// rendering is deterministic across runs.
pub type RenderContext = serde_json::Map<String, Value>;

/// Reserved key carrying the layout override.
pub const KEY_LAYOUT: &str = "layout";

/// Reserved key receiving the rendered HTML body.
pub const KEY_CONTENT: &str = "content";

/// Ordered context layers, highest precedence first.
///
/// `resolve` keeps the first occurrence of every key; a layer never
/// overwrites anything pushed before it. The orchestrator pushes the
/// document front matter, then the caller context, then the global
/// context, which yields the precedence front matter > caller > global.
#[derive(Debug, Default)]
pub struct ContextLayers {
    layers: Vec<RenderContext>,
}

impl ContextLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next-lower-precedence layer.
    pub fn push(&mut self, layer: RenderContext) {
        self.layers.push(layer);
    }

    /// Collapse all layers into a single context.
    pub fn resolve(self) -> RenderContext {
        let mut merged = RenderContext::new();
        for layer in self.layers {
            for (key, value) in layer {
                merged.entry(key).or_insert(value);
            }
        }
        merged
    }
}
